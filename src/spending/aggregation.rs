//! Groups expense transactions by category for the spending pie chart.

use std::collections::HashMap;

use crate::{Error, backend::Transaction};

/// The colors used for chart slices when no other palette is configured.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
    "#6366F1", "#84CC16",
];

/// An ordered, non-empty list of CSS colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette(Vec<String>);

impl Palette {
    /// Create a palette from a list of CSS colors.
    ///
    /// # Errors
    /// Returns [Error::EmptyPalette] if `colors` is empty.
    pub fn new<I, S>(colors: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();

        if colors.is_empty() {
            return Err(Error::EmptyPalette);
        }

        Ok(Self(colors))
    }

    /// The color for the item at `index`, wrapping around once the palette runs out.
    pub fn color(&self, index: usize) -> &str {
        &self.0[index % self.0.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.iter().map(|&color| color.to_owned()).collect())
    }
}

/// The expenses for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category name, or "Uncategorized".
    pub category: String,
    /// The sum of the absolute expense amounts, always positive.
    pub total: f64,
    /// The share of all expenses in the range 0 to 100.
    pub percentage: f64,
    /// The CSS color for the category's slice.
    pub color: String,
}

/// Sum expenses by category and work out each category's share of the total.
///
/// Income and zero amounts are ignored. Colors are assigned in the order
/// categories are first seen, then the totals are sorted largest first with
/// ties broken by category name. Returns an empty list when there are no
/// expenses.
///
/// # Errors
/// Returns [Error::InvalidAmount] if any transaction's amount is NaN or infinite,
/// or [Error::TotalOverflow] if the expenses add up to more than an `f64` can hold.
pub fn aggregate(
    transactions: &[Transaction],
    palette: &Palette,
) -> Result<Vec<CategoryTotal>, Error> {
    if let Some(transaction) = transactions
        .iter()
        .find(|transaction| !transaction.cad_amount.is_finite())
    {
        tracing::error!(
            "transaction {} has invalid amount {}",
            transaction.id,
            transaction.cad_amount
        );
        return Err(Error::InvalidAmount(transaction.id.to_string()));
    }

    let mut groups: Vec<(&str, f64)> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions.iter().filter(|transaction| transaction.is_expense()) {
        let category = transaction.category_label();
        let amount = transaction.cad_amount.abs();

        match group_index.get(category) {
            Some(&index) => groups[index].1 += amount,
            None => {
                group_index.insert(category, groups.len());
                groups.push((category, amount));
            }
        }
    }

    let grand_total: f64 = groups.iter().map(|(_, total)| total).sum();

    if !grand_total.is_finite() {
        tracing::error!("total expenses of {} transactions overflowed", transactions.len());
        return Err(Error::TotalOverflow);
    }

    if grand_total <= 0.0 {
        return Ok(Vec::new());
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .enumerate()
        .map(|(index, (category, total))| CategoryTotal {
            category: category.to_owned(),
            total,
            percentage: 100.0 * total / grand_total,
            color: palette.color(index).to_owned(),
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        backend::{UNCATEGORIZED_LABEL, test_transaction},
    };

    use super::{DEFAULT_PALETTE, Palette, aggregate};

    #[test]
    fn empty_palette_is_rejected() {
        let result = Palette::new(Vec::<String>::new());

        assert_eq!(result, Err(Error::EmptyPalette));
    }

    #[test]
    fn empty_input_gives_empty_totals() {
        let totals = aggregate(&[], &Palette::default()).unwrap();

        assert!(totals.is_empty());
    }

    #[test]
    fn income_only_gives_empty_totals() {
        let transactions = [
            test_transaction(1, "Pay", 1000.0),
            test_transaction(2, "Refund", 20.0),
            test_transaction(3, "Food", 0.0),
        ];

        let totals = aggregate(&transactions, &Palette::default()).unwrap();

        assert!(totals.is_empty());
    }

    #[test]
    fn splits_evenly_and_breaks_ties_by_name() {
        let transactions = [
            test_transaction(1, "Gas", -100.0),
            test_transaction(2, "Food", -50.0),
            test_transaction(3, "Food", -50.0),
        ];

        let totals = aggregate(&transactions, &Palette::default()).unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "Food");
        assert_eq!(totals[0].total, 100.0);
        assert_eq!(totals[0].percentage, 50.0);
        assert_eq!(totals[1].category, "Gas");
        assert_eq!(totals[1].percentage, 50.0);
    }

    #[test]
    fn colors_follow_first_seen_order_not_sorted_order() {
        let transactions = [
            test_transaction(1, "Small", -1.0),
            test_transaction(2, "Large", -99.0),
        ];

        let totals = aggregate(&transactions, &Palette::default()).unwrap();

        assert_eq!(totals[0].category, "Large");
        assert_eq!(totals[0].color, DEFAULT_PALETTE[1]);
        assert_eq!(totals[1].category, "Small");
        assert_eq!(totals[1].color, DEFAULT_PALETTE[0]);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let transactions: Vec<_> = (1..=7)
            .map(|i| test_transaction(i, &format!("Category {}", i % 4), -(i as f64) * 3.33))
            .collect();

        let totals = aggregate(&transactions, &Palette::default()).unwrap();
        let sum: f64 = totals.iter().map(|total| total.percentage).sum();

        assert!((sum - 100.0).abs() < 1e-9, "got {sum}");
    }

    #[test]
    fn palette_cycles_when_categories_outnumber_colors() {
        let transactions: Vec<_> = (0..11)
            .map(|i| test_transaction(i, &format!("Category {i:02}"), -10.0))
            .collect();

        let totals = aggregate(&transactions, &Palette::default()).unwrap();

        assert_eq!(totals.len(), 11);
        let eleventh = totals
            .iter()
            .find(|total| total.category == "Category 10")
            .unwrap();
        assert_eq!(eleventh.color, DEFAULT_PALETTE[0]);
    }

    #[test]
    fn missing_category_is_grouped_as_uncategorized() {
        let mut no_category = test_transaction(1, "", -5.0);
        no_category.category = None;
        let transactions = [no_category, test_transaction(2, "", -5.0)];

        let totals = aggregate(&transactions, &Palette::default()).unwrap();

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].category, UNCATEGORIZED_LABEL);
        assert_eq!(totals[0].total, 10.0);
        assert_eq!(totals[0].percentage, 100.0);
    }

    #[test]
    fn non_finite_amount_is_an_error() {
        let transactions = [
            test_transaction(1, "Food", -5.0),
            test_transaction(2, "Food", f64::NAN),
        ];

        let result = aggregate(&transactions, &Palette::default());

        assert_eq!(result, Err(Error::InvalidAmount("2".to_owned())));
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let transactions = [
            test_transaction(1, "Rent", -1e308),
            test_transaction(2, "Food", -1e308),
        ];

        let result = aggregate(&transactions, &Palette::default());

        assert_eq!(result, Err(Error::TotalOverflow));
    }

    #[test]
    fn does_not_modify_input() {
        let transactions = vec![test_transaction(1, "Food", -5.0)];
        let before = transactions.clone();

        aggregate(&transactions, &Palette::default()).unwrap();

        assert_eq!(transactions, before);
    }
}
