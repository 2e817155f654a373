use rust_decimal::Decimal;

/// Totals shown in the cart and charged on the order. Both go through
/// `Totals::compute` so they can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub delivery_charge: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// `lines` are (unit price, quantity). No delivery charge on an empty cart.
    pub fn compute<I>(lines: I, delivery_charge: Decimal) -> Self
    where
        I: IntoIterator<Item = (Decimal, i32)>,
    {
        let mut subtotal = Decimal::ZERO;
        let mut count = 0usize;
        for (price, quantity) in lines {
            subtotal += line_total(price, quantity);
            count += 1;
        }

        let delivery_charge = if count == 0 {
            Decimal::ZERO
        } else {
            delivery_charge.round_dp(2)
        };

        Self {
            subtotal,
            delivery_charge,
            total: subtotal + delivery_charge,
        }
    }
}

pub fn line_total(price: Decimal, quantity: i32) -> Decimal {
    (price * Decimal::from(quantity)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_add_delivery_charge() {
        let totals = Totals::compute(
            [(Decimal::new(49900, 2), 2), (Decimal::new(125050, 2), 1)],
            Decimal::from(50),
        );

        assert_eq!(totals.subtotal, Decimal::new(224850, 2));
        assert_eq!(totals.delivery_charge, Decimal::from(50));
        assert_eq!(totals.total, Decimal::new(229850, 2));
    }

    #[test]
    fn test_empty_cart_has_no_delivery_charge() {
        let totals = Totals::compute(std::iter::empty(), Decimal::from(50));
        assert_eq!(totals.total, Decimal::ZERO);
        assert_eq!(totals.delivery_charge, Decimal::ZERO);
    }

    #[test]
    fn test_line_total_rounds_to_paise() {
        assert_eq!(line_total(Decimal::new(33333, 3), 3), Decimal::new(10000, 2));
    }
}
