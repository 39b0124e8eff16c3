//! Savings-based first solution.
//!
//! Visits start as single-visit chains. Chains are joined tail-to-head in
//! order of decreasing saving while the merged chain still fits one vehicle
//! and at least one vehicle may serve all of it. Each chain then takes the
//! cheapest free eligible vehicle; chains left over are split and placed by
//! cheapest insertion. A visit that fits nowhere may take the seat of a visit
//! that can move to another vehicle; otherwise it is dropped.

use super::state::{Context, Guide, Working};

struct Chain {
    visits: Vec<usize>,
    load: u32,
    eligible: Vec<bool>,
    alive: bool,
}

pub(crate) fn savings(ctx: &Context<'_>, guide: &Guide) -> Working {
    let vehicles = ctx.vehicles();
    let destination = ctx.problem.destination;
    let multiplier = ctx.problem.penalties.first_leg_multiplier;

    let mut unassigned = Vec::new();
    let mut chains: Vec<Chain> = Vec::new();
    let mut chain_of: Vec<Option<usize>> = vec![None; ctx.visits()];
    for visit in 0..ctx.visits() {
        if ctx.eligible(visit).iter().any(|&eligible| eligible) {
            chain_of[visit] = Some(chains.len());
            chains.push(Chain {
                visits: vec![visit],
                load: ctx.demand(visit),
                eligible: ctx.eligible(visit).to_vec(),
                alive: true,
            });
        } else {
            unassigned.push(visit);
        }
    }

    // Cheapest weighted way to open a route at each visit.
    let opening: Vec<i64> = (0..ctx.visits())
        .map(|visit| {
            (0..vehicles)
                .filter(|&vehicle| ctx.can_serve(vehicle, visit))
                .map(|vehicle| multiplier * ctx.arc(ctx.problem.starts[vehicle], ctx.node(visit)))
                .min()
                .unwrap_or(0)
        })
        .collect();

    let servable: Vec<usize> = (0..ctx.visits()).filter(|&v| chain_of[v].is_some()).collect();
    let mut savings = Vec::new();
    for &i in &servable {
        for &j in &servable {
            if i == j {
                continue;
            }
            let saving = ctx.arc(ctx.node(i), destination) + opening[j] - ctx.arc(ctx.node(i), ctx.node(j));
            if saving > 0 {
                savings.push((saving, i, j));
            }
        }
    }
    savings.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    for (_, i, j) in savings {
        let (Some(head), Some(tail)) = (chain_of[i], chain_of[j]) else {
            continue;
        };
        if head == tail
            || chains[head].visits.last() != Some(&i)
            || chains[tail].visits.first() != Some(&j)
            || chains[head].load + chains[tail].load > ctx.capacity()
        {
            continue;
        }
        let eligible: Vec<bool> = chains[head]
            .eligible
            .iter()
            .zip(&chains[tail].eligible)
            .map(|(a, b)| *a && *b)
            .collect();
        if !eligible.contains(&true) {
            continue;
        }

        let absorbed = std::mem::take(&mut chains[tail].visits);
        let load = chains[tail].load;
        chains[tail].alive = false;
        for &visit in &absorbed {
            chain_of[visit] = Some(head);
        }
        let chain = &mut chains[head];
        chain.visits.extend(absorbed);
        chain.load += load;
        chain.eligible = eligible;
    }

    let mut order: Vec<usize> = (0..chains.len()).filter(|&c| chains[c].alive).collect();
    // Chains with the fewest eligible vehicles pick first, then the heaviest.
    order.sort_by_key(|&c| {
        let eligible = chains[c].eligible.iter().filter(|&&e| e).count();
        (eligible, std::cmp::Reverse(chains[c].load), c)
    });

    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); vehicles];
    let mut leftovers = Vec::new();
    for c in order {
        let chain = &chains[c];
        let vehicle = (0..vehicles)
            .filter(|&vehicle| chain.eligible[vehicle] && routes[vehicle].is_empty())
            .min_by_key(|&vehicle| (ctx.travel(vehicle, &chain.visits), vehicle));
        match vehicle {
            Some(vehicle) => routes[vehicle] = chain.visits.clone(),
            None => leftovers.extend(chain.visits.iter().copied()),
        }
    }

    let fixed_cost = ctx.problem.penalties.vehicle_fixed_cost;
    let mut loads: Vec<u32> = routes
        .iter()
        .map(|route| route.iter().map(|&visit| ctx.demand(visit)).sum())
        .collect();
    // Most constrained first.
    leftovers.sort_by_key(|&visit| {
        let eligible = ctx.eligible(visit).iter().filter(|&&e| e).count();
        (eligible, std::cmp::Reverse(ctx.demand(visit)), visit)
    });
    for visit in leftovers {
        let mut best: Option<(i64, usize, usize)> = None;
        for vehicle in 0..vehicles {
            if !ctx.can_serve(vehicle, visit) || loads[vehicle] + ctx.demand(visit) > ctx.capacity() {
                continue;
            }
            let route = &routes[vehicle];
            // Opening an idle vehicle pays its fixed cost.
            let before = if route.is_empty() {
                -fixed_cost
            } else {
                ctx.travel(vehicle, route)
            };
            for position in 0..=route.len() {
                let mut candidate = route.clone();
                candidate.insert(position, visit);
                let delta = ctx.travel(vehicle, &candidate) - before;
                if best.is_none_or(|(best_delta, _, _)| delta < best_delta) {
                    best = Some((delta, vehicle, position));
                }
            }
        }
        match best {
            Some((_, vehicle, position)) => {
                routes[vehicle].insert(position, visit);
                loads[vehicle] += ctx.demand(visit);
            }
            None => {
                if !make_room(ctx, &mut routes, &mut loads, visit) {
                    unassigned.push(visit);
                }
            }
        }
    }

    unassigned.sort_unstable();
    Working::new(ctx, guide, routes, unassigned)
}

/// Place `visit` by moving one visit out of an eligible full route into
/// another route with room for it. Local search tidies the order afterwards.
fn make_room(ctx: &Context<'_>, routes: &mut [Vec<usize>], loads: &mut [u32], visit: usize) -> bool {
    let capacity = ctx.capacity();
    for vehicle in 0..routes.len() {
        if !ctx.can_serve(vehicle, visit) {
            continue;
        }
        for index in 0..routes[vehicle].len() {
            let other = routes[vehicle][index];
            if loads[vehicle] - ctx.demand(other) + ctx.demand(visit) > capacity {
                continue;
            }
            let target = (0..routes.len()).find(|&target| {
                target != vehicle && ctx.can_serve(target, other) && loads[target] + ctx.demand(other) <= capacity
            });
            if let Some(target) = target {
                routes[vehicle][index] = visit;
                loads[vehicle] = loads[vehicle] - ctx.demand(other) + ctx.demand(visit);
                routes[target].push(other);
                loads[target] += ctx.demand(other);
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DistanceMatrix;
    use crate::solver::{Penalties, RoutingProblem, VisitNode};

    /// Starts at 0 and 10, visits at 12 (vehicle 1 only) and 11, destination 20.
    fn problem() -> RoutingProblem {
        let positions = [0i64, 10, 12, 11, 20];
        let rows = positions
            .iter()
            .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
            .collect();
        RoutingProblem {
            matrix: DistanceMatrix::from_rows(rows).expect("square"),
            starts: vec![0, 1],
            destination: 4,
            visits: vec![VisitNode::new(2, 2).allowed(vec![1]), VisitNode::new(3, 2)],
            capacity: 2,
            penalties: Penalties::default(),
        }
    }

    #[test]
    fn restricted_chain_binds_first() {
        let problem = problem();
        let ctx = Context::new(&problem);
        let working = savings(&ctx, &Guide::new(problem.matrix.size()));

        assert!(working.unassigned.is_empty());
        assert_eq!(working.routes, vec![vec![1], vec![0]]);
    }

    #[test]
    fn make_room_moves_flexible_visit() {
        let problem = problem();
        let ctx = Context::new(&problem);
        let mut routes = vec![vec![], vec![1]];
        let mut loads = vec![0, 2];

        assert!(make_room(&ctx, &mut routes, &mut loads, 0));
        assert_eq!(routes, vec![vec![1], vec![0]]);
        assert_eq!(loads, vec![2, 2]);
    }

    #[test]
    fn oversized_visit_is_unassigned() {
        let mut problem = problem();
        problem.visits[1].demand = 3;
        let ctx = Context::new(&problem);
        let working = savings(&ctx, &Guide::new(problem.matrix.size()));

        assert_eq!(working.unassigned, vec![1]);
    }
}
