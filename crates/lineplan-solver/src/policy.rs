//! The Policy Sorter: a pure function mapping `(orders, policy, now)` to an
//! ordered sequence.

use chrono::{DateTime, Utc};
use lineplan_core::{Policy, Product, SalesOrder};

/// Total working minutes to produce `order.quantity` units of `order`'s product.
///
/// Panics if `product.id != order.product_id`; callers are expected to look
/// the product up by `order.product_id` first.
pub fn production_minutes(order: &SalesOrder, product: &Product) -> i64 {
    debug_assert_eq!(order.product_id, product.id);
    product.production_minutes(order.quantity)
}

/// Order `orders` per `policy`, using `product_lookup` to resolve each
/// order's product for the policies that need production time.
///
/// Stable sort; ties are broken by the declared tie-breaker chain. Pure:
/// never mutates its inputs and returns a freshly ordered vector of clones.
pub fn sort_orders<'a, F>(
    orders: &[SalesOrder],
    product_lookup: F,
    policy: Policy,
    now: DateTime<Utc>,
) -> Vec<SalesOrder>
where
    F: Fn(&str) -> Option<&'a Product>,
{
    let mut sorted: Vec<SalesOrder> = orders.to_vec();
    match policy {
        Policy::Edf => {
            sorted.sort_by(|a, b| (a.deadline, a.priority, &a.id).cmp(&(b.deadline, b.priority, &b.id)));
        }
        Policy::Priority => {
            sorted.sort_by(|a, b| (a.priority, a.deadline, &a.id).cmp(&(b.priority, b.deadline, &b.id)));
        }
        Policy::Sjf => {
            sorted.sort_by(|a, b| {
                let pa = production_minutes_or_max(a, &product_lookup);
                let pb = production_minutes_or_max(b, &product_lookup);
                (pa, a.deadline, &a.id).cmp(&(pb, b.deadline, &b.id))
            });
        }
        Policy::Ljf => {
            sorted.sort_by(|a, b| {
                let pa = production_minutes_or_max(a, &product_lookup);
                let pb = production_minutes_or_max(b, &product_lookup);
                (std::cmp::Reverse(pa), a.deadline, &a.id).cmp(&(std::cmp::Reverse(pb), b.deadline, &b.id))
            });
        }
        Policy::Slack => {
            sorted.sort_by(|a, b| {
                let sa = slack_key(a, &product_lookup, now);
                let sb = slack_key(b, &product_lookup, now);
                (sa, a.deadline, &a.id).cmp(&(sb, b.deadline, &b.id))
            });
        }
        Policy::Customer => {
            sorted.sort_by(|a, b| {
                (a.customer.rank_or_default(), a.deadline, a.priority)
                    .cmp(&(b.customer.rank_or_default(), b.deadline, b.priority))
            });
        }
    }
    sorted
}

fn production_minutes_or_max<'a>(order: &SalesOrder, product_lookup: &impl Fn(&str) -> Option<&'a Product>) -> i64 {
    product_lookup(&order.product_id).map_or(i64::MAX, |p| production_minutes(order, p))
}

/// `deadline − now − production_minutes`, expressed in minutes for ordering
/// purposes (raw calendar minutes, not working minutes — the SLACK policy
/// only needs a consistent ranking key, not a calendar-accurate duration).
fn slack_key<'a>(order: &SalesOrder, product_lookup: &impl Fn(&str) -> Option<&'a Product>, now: DateTime<Utc>) -> i64 {
    let until_deadline = (order.deadline - now).num_minutes();
    let production = production_minutes_or_max(order, product_lookup);
    until_deadline.saturating_sub(production)
}
