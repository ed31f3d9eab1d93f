//! Field-set validation for insert and update.
//!
//! Checks run in a fixed column order so the first offending field is the
//! one reported: name, price, quantity, supplier name, supplier phone.

use crate::error::ValidationError;
use crate::record::FieldSet;
use crate::types::{Column, Value};

/// Validate a field set for insert.
///
/// - `id` must not be supplied
/// - `name`, `supplierName`, `supplierPhone` must be present and non-null
/// - `price`, `quantity` must be non-negative integers when present
pub fn validate_insert(fields: &FieldSet) -> Result<(), ValidationError> {
    reject_id(fields)?;
    for column in Column::WRITABLE {
        match fields.get(column) {
            None if column.is_integer() => {}
            None => return Err(ValidationError::invalid(column, "is required")),
            Some(value) => check_value(column, value)?,
        }
    }
    Ok(())
}

/// Validate a partial field set for update.
///
/// Only the columns actually present are checked; absent columns are left
/// untouched by the update and need no validation.
pub fn validate_update(fields: &FieldSet) -> Result<(), ValidationError> {
    reject_id(fields)?;
    for column in Column::WRITABLE {
        if let Some(value) = fields.get(column) {
            check_value(column, value)?;
        }
    }
    Ok(())
}

fn reject_id(fields: &FieldSet) -> Result<(), ValidationError> {
    if fields.contains(Column::Id) {
        return Err(ValidationError::invalid(Column::Id, "is assigned by the store"));
    }
    Ok(())
}

fn check_value(column: Column, value: &Value) -> Result<(), ValidationError> {
    if column.is_integer() {
        // Null passes here; the table's NOT NULL constraint turns it into a
        // storage-level failure instead.
        if value.is_null() {
            return Ok(());
        }
        match value.as_integer() {
            Some(n) if n < 0 => Err(ValidationError::invalid(column, "must not be negative")),
            Some(_) => Ok(()),
            None => Err(ValidationError::invalid(column, "must be a whole number")),
        }
    } else {
        match value {
            Value::Null => Err(ValidationError::invalid(column, "must not be null")),
            Value::Text(_) => Ok(()),
            Value::Integer(_) => Err(ValidationError::invalid(column, "must be text")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> FieldSet {
        FieldSet::new()
            .with(Column::Name, "Widget")
            .with(Column::Price, 10)
            .with(Column::Quantity, 5)
            .with(Column::SupplierName, "Acme")
            .with(Column::SupplierPhone, "555-1234")
    }

    #[test]
    fn test_valid_insert() {
        assert!(validate_insert(&widget()).is_ok());
    }

    #[test]
    fn test_insert_defaults_are_optional() {
        let mut fields = widget();
        fields.remove(Column::Price);
        fields.remove(Column::Quantity);
        assert!(validate_insert(&fields).is_ok());
    }

    #[test]
    fn test_insert_requires_text_fields() {
        for column in [Column::Name, Column::SupplierName, Column::SupplierPhone] {
            let mut fields = widget();
            fields.remove(column);
            assert_eq!(validate_insert(&fields).unwrap_err().field(), column);

            let mut fields = widget();
            fields.put_null(column);
            assert_eq!(validate_insert(&fields).unwrap_err().field(), column);
        }
    }

    #[test]
    fn test_negative_numbers_rejected() {
        for column in [Column::Price, Column::Quantity] {
            let fields = widget().with(column, -1);
            assert_eq!(
                validate_insert(&fields).unwrap_err(),
                ValidationError::InvalidField {
                    field: column,
                    reason: "must not be negative"
                }
            );
            let partial = FieldSet::new().with(column, -1);
            assert_eq!(validate_update(&partial).unwrap_err().field(), column);
        }
    }

    #[test]
    fn test_first_failure_in_column_order() {
        let fields = FieldSet::new()
            .with(Column::Price, -3)
            .with(Column::SupplierName, "Acme");
        // name is checked before price
        assert_eq!(validate_insert(&fields).unwrap_err().field(), Column::Name);
    }

    #[test]
    fn test_update_checks_only_present_fields() {
        assert!(validate_update(&FieldSet::new().with(Column::Quantity, 7)).is_ok());
        assert!(validate_update(&FieldSet::new()).is_ok());

        let mut fields = FieldSet::new();
        fields.put_null(Column::SupplierPhone);
        assert_eq!(
            validate_update(&fields).unwrap_err().field(),
            Column::SupplierPhone
        );
    }

    #[test]
    fn test_numeric_text_is_coerced() {
        assert!(validate_update(&FieldSet::new().with(Column::Price, "12")).is_ok());
        assert_eq!(
            validate_update(&FieldSet::new().with(Column::Price, "-2"))
                .unwrap_err()
                .field(),
            Column::Price
        );
        assert!(validate_update(&FieldSet::new().with(Column::Price, "abc")).is_err());
    }

    #[test]
    fn test_client_id_rejected() {
        let fields = widget().with(Column::Id, 9);
        assert_eq!(validate_insert(&fields).unwrap_err().field(), Column::Id);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sign_decides_numeric_validity(price in any::<i64>(), quantity in any::<i64>()) {
                let fields = widget().with(Column::Price, price).with(Column::Quantity, quantity);
                let result = validate_insert(&fields);
                prop_assert_eq!(result.is_ok(), price >= 0 && quantity >= 0);
            }

            #[test]
            fn any_text_is_a_valid_name(name in ".*") {
                prop_assert!(validate_update(&FieldSet::new().with(Column::Name, name)).is_ok());
            }
        }
    }
}
