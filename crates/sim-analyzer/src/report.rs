//! Plain-text formatting for the analyzer's output, used by the CLI and
//! by the simulation runtime when cross-checking an observed attack
//! outcome against the theoretical model.

use crate::probability::attack_success_probability;

/// Renders a `q` × `z` probability table as plain text, one row per `z`
/// in `confirmations`.
pub fn format_report(q: f64, confirmations: &[u64]) -> String {
    let mut out = String::new();
    out.push_str(&format!("attacker share q = {q:.4}\n"));
    out.push_str("z (confirmations)   P(success)\n");
    for &z in confirmations {
        let p = attack_success_probability(q, z);
        out.push_str(&format!("{z:>17}   {p:.7}\n"));
    }
    out
}
