use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_not_blank;
use crate::models::servicemodel::{NewService, ServicePatch};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceDto {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1-100 characters"),
        custom = "validate_not_blank"
    )]
    pub name: String,

    #[validate(length(min = 1, max = 2000, message = "Description must be between 1-2000 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 16, message = "Emoji is required"))]
    pub emoji: String,

    pub is_new: Option<bool>,
}

impl From<CreateServiceDto> for NewService {
    fn from(dto: CreateServiceDto) -> Self {
        NewService {
            name: dto.name.trim().to_string(),
            description: dto.description,
            emoji: dto.emoji,
            is_new: dto.is_new,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceDto {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1-100 characters"),
        custom = "validate_not_blank"
    )]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Description must be between 1-2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 16, message = "Emoji cannot be empty"))]
    pub emoji: Option<String>,

    pub is_new: Option<bool>,
}

impl From<UpdateServiceDto> for ServicePatch {
    fn from(dto: UpdateServiceDto) -> Self {
        ServicePatch {
            name: dto.name.map(|name| name.trim().to_string()),
            description: dto.description,
            emoji: dto.emoji,
            is_new: dto.is_new,
        }
    }
}
