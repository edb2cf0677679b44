// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Currency rendering for display.

use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY_SYMBOL: &str = "₹";

/// Renders `amount` in rupees with Indian digit grouping and two decimals,
/// e.g. `₹12,34,567.89`. Negative amounts render as `₹-50.00`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{CURRENCY_SYMBOL}{sign}{}.{fraction}", group_indian(whole))
}

/// Last three digits form one group, every two digits before that another.
fn group_indian(whole: &str) -> String {
    if whole.len() <= 3 {
        return whole.to_owned();
    }

    let (mut rest, last) = whole.split_at(whole.len() - 3);
    let mut groups = vec![last];
    while rest.len() > 2 {
        let (head, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = head;
    }
    groups.push(rest);
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::format_amount;
    use rust_decimal_macros::dec;

    #[test]
    fn small_amounts() {
        assert_eq!(format_amount(dec!(0)), "₹0.00");
        assert_eq!(format_amount(dec!(7.5)), "₹7.50");
        assert_eq!(format_amount(dec!(999)), "₹999.00");
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_amount(dec!(1000)), "₹1,000.00");
        assert_eq!(format_amount(dec!(100000)), "₹1,00,000.00");
        assert_eq!(format_amount(dec!(1234567.891)), "₹12,34,567.89");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_amount(dec!(0.005)), "₹0.01");
        assert_eq!(format_amount(dec!(-0.005)), "₹-0.01");
        assert_eq!(format_amount(dec!(-0.001)), "₹0.00");
    }

    #[test]
    fn negative_amounts_keep_symbol_first() {
        assert_eq!(format_amount(dec!(-50)), "₹-50.00");
        assert_eq!(format_amount(dec!(-123456)), "₹-1,23,456.00");
    }
}
