use serde::Deserialize;

use crate::contract::model::{Post, User};

/// Wire layout of the remote user endpoint. Only the fields the panel uses
/// are decoded; the rest of the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUserDto {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
}

/// Wire layout of the remote post endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPostDto {
    pub id: u64,
    pub title: String,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

impl From<SeedUserDto> for User {
    fn from(dto: SeedUserDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            username: dto.username,
            email: dto.email,
        }
    }
}

impl From<SeedPostDto> for Post {
    fn from(dto: SeedPostDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            user_id: dto.user_id,
        }
    }
}
