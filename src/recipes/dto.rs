use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub cuisine: String,
    pub calories: i32,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
}

impl CreateRecipeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.cuisine.trim().is_empty() {
            return Err("cuisine is required");
        }
        if self.calories < 0 {
            return Err("calories must not be negative");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CalorieRange {
    pub lower: i32,
    pub upper: i32,
}

impl CalorieRange {
    pub fn is_valid(&self) -> bool {
        self.lower <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str, cuisine: &str, calories: i32) -> CreateRecipeRequest {
        CreateRecipeRequest {
            name: name.into(),
            cuisine: cuisine.into(),
            calories,
            ingredients: None,
            instructions: None,
        }
    }

    #[test]
    fn create_request_validation() {
        assert!(req("Carbonara", "Italian", 650).validate().is_ok());
        assert!(req("Water", "Any", 0).validate().is_ok());
        assert_eq!(req("  ", "Italian", 650).validate(), Err("name is required"));
        assert_eq!(req("Carbonara", "", 650).validate(), Err("cuisine is required"));
        assert!(req("Carbonara", "Italian", -1).validate().is_err());
    }

    #[test]
    fn calorie_range_bounds_are_inclusive() {
        assert!(CalorieRange { lower: 300, upper: 300 }.is_valid());
        assert!(CalorieRange { lower: 0, upper: 800 }.is_valid());
        assert!(!CalorieRange { lower: 800, upper: 300 }.is_valid());
    }
}
