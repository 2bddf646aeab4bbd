// 📐 Form validation for the add-person and add-item flows
//
// Raw text in, either a ready-to-use value or every field error at once.

use crate::entities::Cents;
use crate::money::parse_price;

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: &str) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, Vec<ValidationError>>;

// ============================================================================
// CONSUMABLE FORM
// ============================================================================

/// What the user typed in the new-item form
#[derive(Debug, Clone, Default)]
pub struct ConsumableForm {
    pub name: String,
    pub quantity: String,
    pub price: String,
}

/// A validated new item, ready for `TableManager::add_consumable`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConsumable {
    pub name: String,
    pub price: Cents,
    pub quantity: u32,
}

impl ConsumableForm {
    pub fn new(name: &str, quantity: &str, price: &str) -> Self {
        ConsumableForm {
            name: name.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
        }
    }

    pub fn validate(&self) -> ValidationResult<NewConsumable> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::new("name", "Required field is empty"));
        }

        let quantity_text = self.quantity.trim();
        let quantity = if quantity_text.is_empty() {
            errors.push(ValidationError::new("quantity", "Required field is empty"));
            None
        } else {
            match quantity_text.parse::<u32>() {
                Ok(q) if q >= 1 => Some(q),
                _ => {
                    errors.push(ValidationError::new(
                        "quantity",
                        "Must be a whole number of at least 1",
                    ));
                    None
                }
            }
        };

        let price = if self.price.trim().is_empty() {
            errors.push(ValidationError::new("price", "Required field is empty"));
            None
        } else {
            let parsed = parse_price(&self.price);
            if parsed.is_none() {
                errors.push(ValidationError::new(
                    "price",
                    "Must be a non-negative amount like 12.50",
                ));
            }
            parsed
        };

        match (quantity, price) {
            (Some(quantity), Some(price)) if errors.is_empty() => Ok(NewConsumable {
                name: name.to_string(),
                price,
                quantity,
            }),
            _ => Err(errors),
        }
    }
}

/// Trimmed person name, or an error if nothing is left
pub fn validate_person_name(text: &str) -> ValidationResult<String> {
    let name = text.trim();
    if name.is_empty() {
        Err(vec![ValidationError::new("name", "Required field is empty")])
    } else {
        Ok(name.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_form() {
        let form = ConsumableForm::new("  Beer ", "3", "4.50");

        assert_eq!(
            form.validate(),
            Ok(NewConsumable {
                name: "Beer".to_string(),
                price: 450,
                quantity: 3,
            })
        );
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = ConsumableForm::default().validate().unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "quantity", "price"]);
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let errors = ConsumableForm::new("Beer", "0", "4.50").validate().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "quantity");
    }

    #[test]
    fn test_bad_price_is_rejected() {
        let errors = ConsumableForm::new("Beer", "1", "four").validate().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "price");
        assert_eq!(errors[0].to_string(), "price: Must be a non-negative amount like 12.50");
    }

    #[test]
    fn test_person_name() {
        assert_eq!(validate_person_name("  ana "), Ok("ana".to_string()));
        assert!(validate_person_name("   ").is_err());
    }
}
