/*
 * Responsibility
 * - The hotel API's access rules, in evaluation order
 * - Compiled once at startup into a `PolicyTable`
 *
 * Order matters: the table is first-match-wins. Public GET rules for catalog
 * sub-paths must stay above the write rules and the final catch-all for the
 * whole API prefix.
 */
use axum::http::Method;

use crate::services::authz::{PatternError, PolicyTable, Requirement, Rule};

pub const API_PREFIX: &str = "/api";

const MANAGEMENT: &[&str] = &["MANAGER", "ADMIN"];
const FRONT_DESK: &[&str] = &["RECEPTIONIST", "MANAGER", "ADMIN"];
const HOUSEKEEPING: &[&str] = &["HOUSEKEEPER", "MANAGER", "ADMIN"];

fn rules() -> Vec<(Option<Method>, &'static str, Requirement)> {
    use Requirement::{Authenticated, Public};
    let any = Requirement::any_role;

    vec![
        // accounts
        (None, "/api/auth/me", Authenticated),
        (None, "/api/auth/**", Public),
        // public catalog
        (Some(Method::GET), "/api/rooms/**", Public),
        (Some(Method::GET), "/api/room-types/**", Public),
        (Some(Method::GET), "/api/amenities/**", Public),
        (Some(Method::GET), "/api/reviews/**", Public),
        (Some(Method::POST), "/api/payments/webhook", Public),
        // staff areas
        (None, "/api/dashboard/**", any(MANAGEMENT)),
        (None, "/api/reports/**", any(MANAGEMENT)),
        (None, "/api/users/**", any(&["ADMIN"])),
        (None, "/api/rooms/**", any(MANAGEMENT)),
        (None, "/api/room-types/**", any(MANAGEMENT)),
        (None, "/api/amenities/**", any(MANAGEMENT)),
        (None, "/api/housekeeping/**", any(HOUSEKEEPING)),
        (None, "/api/invoices/**", any(FRONT_DESK)),
        (Some(Method::POST), "/api/bookings/*/check-in", any(FRONT_DESK)),
        (Some(Method::POST), "/api/bookings/*/check-out", any(FRONT_DESK)),
        (Some(Method::GET), "/api/bookings/all", any(FRONT_DESK)),
        // signed-in customers and staff
        (None, "/api/bookings/**", Authenticated),
        (None, "/api/**", Authenticated),
    ]
}

pub fn policy_table() -> Result<PolicyTable, PatternError> {
    let rules = rules()
        .into_iter()
        .map(|(method, pattern, requirement)| Rule::new(method, pattern, requirement))
        .collect::<Result<Vec<_>, _>>()?;

    PolicyTable::new(API_PREFIX, rules)
}
