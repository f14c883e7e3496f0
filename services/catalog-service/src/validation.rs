use common::Game;
use rust_decimal::Decimal;

pub const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
/// 99999999.99, the largest value a `DECIMAL(10, 2)` column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);
pub const MAX_TEXT_LEN: usize = 255;
pub const MAX_NAME_LEN: usize = 100;

fn validate_length(field: &str, value: &str, max: usize) -> Result<(), String> {
     if value.chars().count() > max {
          return Err(format!("{} must be at most {} characters", field, max));
     }
     Ok(())
}

pub fn validate_title(title: &str) -> Result<(), String> {
     if title.trim().is_empty() {
          return Err("Game title is required".to_string());
     }
     validate_length("Game title", title.trim(), MAX_TEXT_LEN)
}

pub fn validate_rating(rating: Decimal) -> Result<(), String> {
     if rating < Decimal::ZERO || rating > MAX_RATING {
          return Err(format!("Average rating must be between 0 and {}", MAX_RATING));
     }
     Ok(())
}

pub fn validate_price(price: Decimal) -> Result<(), String> {
     if price < Decimal::ZERO {
          return Err("Price must not be negative".to_string());
     }
     if price > MAX_PRICE {
          return Err(format!("Price must not exceed {}", MAX_PRICE));
     }
     Ok(())
}

pub fn validate_game(game: &Game) -> Result<(), String> {
     validate_title(&game.title)?;
     validate_length("Developer", &game.developer, MAX_TEXT_LEN)?;
     validate_length("Publisher", &game.publisher, MAX_TEXT_LEN)?;
     validate_length("Image URL", &game.image_url, MAX_TEXT_LEN)?;
     validate_price(game.price)?;
     validate_rating(game.average_rating)?;
     Ok(())
}

/// Genres and platforms share the same rule: a non-blank name that fits
/// the column.
pub fn validate_reference_name(kind: &str, name: &str) -> Result<(), String> {
     if name.trim().is_empty() {
          return Err(format!("{} name is required", kind));
     }
     validate_length(&format!("{} name", kind), name.trim(), MAX_NAME_LEN)
}

#[cfg(test)]
mod tests {
     use super::*;
     use std::str::FromStr;

     fn dec(value: &str) -> Decimal {
          Decimal::from_str(value).unwrap()
     }

     #[test]
     fn title_must_not_be_blank() {
          assert!(validate_title("Hades").is_ok());
          assert!(validate_title("").is_err());
          assert!(validate_title(" \t\n").is_err());
     }

     #[test]
     fn rating_is_bounded() {
          assert!(validate_rating(dec("0")).is_ok());
          assert!(validate_rating(dec("-0.00")).is_ok());
          assert!(validate_rating(dec("4.75")).is_ok());
          assert!(validate_rating(dec("5.00")).is_ok());
          assert!(validate_rating(dec("5.01")).is_err());
          assert!(validate_rating(dec("-0.5")).is_err());
     }

     #[test]
     fn price_is_non_negative() {
          assert!(validate_price(dec("0")).is_ok());
          assert!(validate_price(dec("59.99")).is_ok());
          assert!(validate_price(dec("-1")).is_err());
          assert_eq!(MAX_PRICE, dec("99999999.99"));
          assert!(validate_price(dec("99999999.99")).is_ok());
          assert!(validate_price(dec("100000000")).is_err());
     }

     #[test]
     fn lengths_fit_the_columns() {
          assert!(validate_title(&"a".repeat(255)).is_ok());
          assert!(validate_title(&"a".repeat(256)).is_err());
          assert!(validate_title(&format!("  {}  ", "é".repeat(255))).is_ok());
          assert!(validate_reference_name("Genre", &"g".repeat(100)).is_ok());
          assert_eq!(
               validate_reference_name("Genre", &"g".repeat(101)),
               Err("Genre name must be at most 100 characters".to_string())
          );

          let mut game = common::Game {
               id: uuid::Uuid::nil(),
               title: "Hades".to_string(),
               description: "x".repeat(10_000),
               developer: String::new(),
               publisher: "p".repeat(256),
               release_date: None,
               price: Decimal::ZERO,
               average_rating: Decimal::ZERO,
               image_url: String::new(),
               genres: vec![],
               platforms: vec![],
               created_at: chrono::Utc::now(),
               updated_at: chrono::Utc::now(),
          };
          assert!(validate_game(&game).is_err());
          game.publisher = "Supergiant".to_string();
          assert!(validate_game(&game).is_ok());
     }

     #[test]
     fn reference_names_must_not_be_blank() {
          assert!(validate_reference_name("Genre", "RPG").is_ok());
          assert_eq!(
               validate_reference_name("Platform", "  "),
               Err("Platform name is required".to_string())
          );
     }
}
