//! Proptest generators for property-based testing.

use proptest::prelude::*;

use stockroom_core::{Column, FieldSet, Value, MAX_QUANTITY};

/// Generate an item name.
pub fn item_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,23}".prop_map(String::from)
}

/// Generate a supplier name.
pub fn supplier_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,15}( (Ltd|Inc|Co))?".prop_map(String::from)
}

/// Generate a phone number.
pub fn supplier_phone() -> impl Strategy<Value = String> {
    "[0-9]{3}-[0-9]{4}".prop_map(String::from)
}

/// Generate a price. Non-negative.
pub fn price() -> impl Strategy<Value = i64> {
    0i64..=1_000_000i64
}

/// Generate a quantity inside the editor counter's range.
pub fn quantity() -> impl Strategy<Value = i64> {
    0i64..=i64::from(MAX_QUANTITY)
}

/// The five client columns.
pub fn writable_column() -> impl Strategy<Value = Column> {
    prop::sample::select(Column::WRITABLE.to_vec())
}

/// Parameters for a valid inventory row.
#[derive(Debug, Clone)]
pub struct ItemParams {
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub supplier_name: String,
    pub supplier_phone: String,
}

impl ItemParams {
    pub fn to_field_set(&self) -> FieldSet {
        FieldSet::new()
            .with(Column::Name, self.name.as_str())
            .with(Column::Price, self.price)
            .with(Column::Quantity, self.quantity)
            .with(Column::SupplierName, self.supplier_name.as_str())
            .with(Column::SupplierPhone, self.supplier_phone.as_str())
    }
}

impl Arbitrary for ItemParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            item_name(),
            price(),
            quantity(),
            supplier_name(),
            supplier_phone(),
        )
            .prop_map(
                |(name, price, quantity, supplier_name, supplier_phone)| ItemParams {
                    name,
                    price,
                    quantity,
                    supplier_name,
                    supplier_phone,
                },
            )
            .boxed()
    }
}

/// Ways to break an otherwise valid insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defect {
    /// A required text column is left out.
    Missing(Column),
    /// A numeric column is negative.
    Negative(Column),
}

impl Defect {
    /// The column validation should name.
    pub fn column(self) -> Column {
        match self {
            Defect::Missing(c) | Defect::Negative(c) => c,
        }
    }

    /// Apply the defect to a field set.
    pub fn apply(self, fields: &mut FieldSet) {
        match self {
            Defect::Missing(column) => {
                fields.remove(column);
            }
            Defect::Negative(column) => {
                let current = fields.integer(column).unwrap_or(0);
                fields.put(column, Value::Integer(-1 - current));
            }
        }
    }
}

/// Generate a defect.
pub fn defect() -> impl Strategy<Value = Defect> {
    prop_oneof![
        Just(Defect::Missing(Column::Name)),
        Just(Defect::Missing(Column::SupplierName)),
        Just(Defect::Missing(Column::SupplierPhone)),
        Just(Defect::Negative(Column::Price)),
        Just(Defect::Negative(Column::Quantity)),
    ]
}

/// Generate a non-empty partial update of valid values.
pub fn partial_update() -> impl Strategy<Value = FieldSet> {
    (
        any::<ItemParams>(),
        prop::collection::btree_set(writable_column(), 1..=Column::WRITABLE.len()),
    )
        .prop_map(|(params, columns)| {
            let full = params.to_field_set();
            columns
                .into_iter()
                .filter_map(|c| full.get(c).cloned().map(|v| (c, v)))
                .collect()
        })
}
