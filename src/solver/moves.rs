//! Neighbourhood operators.
//!
//! Each operator applies the first move that lowers the augmented cost and
//! returns true, or returns false when none does. Capacity and eligibility
//! are checked before a candidate is priced.

use super::state::{Context, Guide, Working};

/// Relocate: move a visit to another position or vehicle, or pull a dropped
/// visit back into a route.
pub(crate) fn relocate(ctx: &Context<'_>, guide: &Guide, working: &mut Working) -> bool {
    let dropped = working.unassigned.len();
    let current = ctx.augmented(guide, working, &[], dropped);

    for from in 0..ctx.vehicles() {
        for index in 0..working.routes[from].len() {
            let visit = working.routes[from][index];
            let mut shortened = working.routes[from].clone();
            shortened.remove(index);

            // Same route, different position.
            for position in 0..=shortened.len() {
                if position == index {
                    continue;
                }
                let mut candidate = shortened.clone();
                candidate.insert(position, visit);
                let cost = ctx.route_cost(guide, from, &candidate);
                if ctx.augmented(guide, working, &[(from, cost)], dropped) < current {
                    working.set_route(ctx, guide, from, candidate);
                    return true;
                }
            }

            let shortened_cost = ctx.route_cost(guide, from, &shortened);
            for to in 0..ctx.vehicles() {
                if to == from || !working.fits(ctx, to, visit) {
                    continue;
                }
                for position in 0..=working.routes[to].len() {
                    let mut candidate = working.routes[to].clone();
                    candidate.insert(position, visit);
                    let cost = ctx.route_cost(guide, to, &candidate);
                    let overrides = [(from, shortened_cost), (to, cost)];
                    if ctx.augmented(guide, working, &overrides, dropped) < current {
                        working.set_route(ctx, guide, from, shortened);
                        working.set_route(ctx, guide, to, candidate);
                        return true;
                    }
                }
            }
        }
    }

    for slot in 0..working.unassigned.len() {
        let visit = working.unassigned[slot];
        for to in 0..ctx.vehicles() {
            if !working.fits(ctx, to, visit) {
                continue;
            }
            for position in 0..=working.routes[to].len() {
                let mut candidate = working.routes[to].clone();
                candidate.insert(position, visit);
                let cost = ctx.route_cost(guide, to, &candidate);
                if ctx.augmented(guide, working, &[(to, cost)], dropped - 1) < current {
                    working.unassigned.remove(slot);
                    working.set_route(ctx, guide, to, candidate);
                    return true;
                }
            }
        }
    }

    false
}

/// 2-opt: reverse a segment within one route.
pub(crate) fn two_opt(ctx: &Context<'_>, guide: &Guide, working: &mut Working) -> bool {
    let dropped = working.unassigned.len();
    let current = ctx.augmented(guide, working, &[], dropped);

    for vehicle in 0..ctx.vehicles() {
        let len = working.routes[vehicle].len();
        if len < 2 {
            continue;
        }
        for i in 0..len - 1 {
            for j in i + 1..len {
                let mut candidate = working.routes[vehicle].clone();
                candidate[i..=j].reverse();
                let cost = ctx.route_cost(guide, vehicle, &candidate);
                if ctx.augmented(guide, working, &[(vehicle, cost)], dropped) < current {
                    working.set_route(ctx, guide, vehicle, candidate);
                    return true;
                }
            }
        }
    }

    false
}

/// Exchange: swap two visits between different vehicles.
pub(crate) fn exchange(ctx: &Context<'_>, guide: &Guide, working: &mut Working) -> bool {
    let dropped = working.unassigned.len();
    let current = ctx.augmented(guide, working, &[], dropped);
    let capacity = ctx.capacity();

    for a in 0..ctx.vehicles() {
        for b in a + 1..ctx.vehicles() {
            for i in 0..working.routes[a].len() {
                for j in 0..working.routes[b].len() {
                    let x = working.routes[a][i];
                    let y = working.routes[b][j];
                    if !ctx.can_serve(a, y) || !ctx.can_serve(b, x) {
                        continue;
                    }
                    if working.loads[a] - ctx.demand(x) + ctx.demand(y) > capacity
                        || working.loads[b] - ctx.demand(y) + ctx.demand(x) > capacity
                    {
                        continue;
                    }

                    let mut route_a = working.routes[a].clone();
                    route_a[i] = y;
                    let mut route_b = working.routes[b].clone();
                    route_b[j] = x;
                    let overrides = [
                        (a, ctx.route_cost(guide, a, &route_a)),
                        (b, ctx.route_cost(guide, b, &route_b)),
                    ];
                    if ctx.augmented(guide, working, &overrides, dropped) < current {
                        working.set_route(ctx, guide, a, route_a);
                        working.set_route(ctx, guide, b, route_b);
                        return true;
                    }
                }
            }
        }
    }

    false
}
