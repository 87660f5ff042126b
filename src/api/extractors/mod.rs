/*!
 * Request-scoped identity for handlers
 *
 * Responsibility:
 * - Hand the gate's Principal to handlers (handlers never read the raw header)
 *
 * Public API:
 * - CurrentPrincipal
 */

mod principal;

pub use principal::CurrentPrincipal;
