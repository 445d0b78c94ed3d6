use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, CategoryWithCount};

#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryForm {
    pub fn parse(&self) -> Result<CategoryInput, Vec<String>> {
        let name = self.name.trim();
        let length = name.chars().count();
        if length < 2 {
            return Err(vec!["Category name must be at least 2 characters".to_string()]);
        }
        if length > 50 {
            return Err(vec!["Category name cannot be longer than 50 characters".to_string()]);
        }

        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(CategoryInput {
            name: name.to_string(),
            description,
        })
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListing {
    pub categories: Vec<CategoryWithCount>,
}
