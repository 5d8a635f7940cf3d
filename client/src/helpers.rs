//! Small display helpers: amount formatting, explorer links, address
//! truncation for log lines.

use solana_sdk::native_token::LAMPORTS_PER_SOL;

const EXPLORER_BASE: &str = "https://explorer.solana.com";

/// Render a lamport amount as a SOL string, trimming trailing zeros.
pub fn format_to_sol(lamports: u64) -> String {
    let sol = lamports as f64 / LAMPORTS_PER_SOL as f64;
    let mut s = format!("{sol:.9}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Convert a decimal SOL amount to lamports, rounding down.
pub fn to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).floor() as u64
}

/// Block-explorer link for a transaction signature.
pub fn explorer_tx_url(signature: &str, cluster: &str) -> String {
    format!("{EXPLORER_BASE}/tx/{signature}?cluster={cluster}")
}

/// Block-explorer link for an account address.
pub fn explorer_address_url(address: &str, cluster: &str) -> String {
    format!("{EXPLORER_BASE}/address/{address}?cluster={cluster}")
}

/// Shorten a base58 address for log output: first and last four characters.
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 8 {
        return address.to_string();
    }
    format!("{}..{}", &address[..4], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_sol() {
        assert_eq!(format_to_sol(9_000_000_000), "9");
    }

    #[test]
    fn formats_fractional_sol() {
        assert_eq!(format_to_sol(1_500_000_000), "1.5");
        assert_eq!(format_to_sol(1), "0.000000001");
    }

    #[test]
    fn lamport_conversion_rounds_down() {
        assert_eq!(to_lamports(2.5), 2_500_000_000);
        assert_eq!(to_lamports(0.000000001), 1);
        // Below one lamport floors to zero.
        assert_eq!(to_lamports(0.0000000001), 0);
    }

    #[test]
    fn explorer_links_carry_the_cluster() {
        assert_eq!(
            explorer_tx_url("abc", "devnet"),
            "https://explorer.solana.com/tx/abc?cluster=devnet"
        );
        assert_eq!(
            explorer_address_url("xyz", "devnet"),
            "https://explorer.solana.com/address/xyz?cluster=devnet"
        );
    }

    #[test]
    fn truncates_long_addresses() {
        assert_eq!(truncate_address("4Nd1mY5cP9qWvXjT2kRbA3fG"), "4Nd1..A3fG");
        assert_eq!(truncate_address("short"), "short");
    }
}
