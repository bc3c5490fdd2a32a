// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, http::StatusCode, web};
use log::error;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::catalog::{
    CatalogError, CategoryChange, CategoryNode, CategorySummary, NewCategory, PopulatedCategory,
    SubtreeSpec, import_subtree,
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryRequest {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parent: Option<Uuid>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    /// Absent means "leave the parent alone"; an explicit `null` moves the
    /// node to root.
    #[serde(default, deserialize_with = "explicit_null")]
    parent: Option<Option<Uuid>>,
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSubcategoriesRequest {
    subcategories: Vec<SubtreeSpec>,
}

#[derive(Serialize)]
struct FailureBody {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct CategoryListBody {
    success: bool,
    categories: Vec<PopulatedCategory>,
}

#[derive(Serialize)]
struct CategoryBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    category: CategoryNode,
}

#[derive(Serialize)]
struct PopulatedCategoryBody {
    success: bool,
    category: PopulatedCategory,
}

#[derive(Serialize)]
struct SubcategoryBody {
    success: bool,
    message: String,
    subcategory: CategoryNode,
}

#[derive(Serialize)]
struct MessageBody {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct SubcategoriesCreatedBody {
    success: bool,
    message: String,
    subcategories: Vec<CategoryNode>,
}

#[derive(Serialize)]
struct ParentRef {
    id: Uuid,
    name: String,
}

#[derive(Serialize)]
struct SubcategoryListBody {
    success: bool,
    category: ParentRef,
    subcategories: Vec<CategorySummary>,
}

/// Maps a catalog error to the stable status code and envelope the admin
/// UI relies on. Storage details are logged, never relayed.
fn error_response(error: &CatalogError) -> HttpResponse {
    let (status, message) = match error {
        CatalogError::InvalidInput(_)
        | CatalogError::ParentNotFound
        | CatalogError::DuplicateName(_)
        | CatalogError::DuplicateSlug(_)
        | CatalogError::CycleRejected => (StatusCode::BAD_REQUEST, error.to_string()),
        CatalogError::NotFound => (StatusCode::NOT_FOUND, error.to_string()),
        CatalogError::Storage(detail) => {
            error!("Category storage failure: {}", detail);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
        }
    };
    HttpResponse::build(status).json(FailureBody {
        success: false,
        message,
    })
}

/// GET /categories — roots with one level of populated children.
pub async fn list_categories(state: web::Data<AppState>) -> HttpResponse {
    match state.catalog.list(None) {
        Ok(categories) => HttpResponse::Ok().json(CategoryListBody {
            success: true,
            categories,
        }),
        Err(error) => error_response(&error),
    }
}

/// POST /categories
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let input = NewCategory {
        name: body.name,
        description: body.description,
        parent: body.parent,
    };
    match state.catalog.create(input) {
        Ok(category) => HttpResponse::Created().json(CategoryBody {
            success: true,
            message: Some("Category created successfully".to_string()),
            category,
        }),
        Err(error) => error_response(&error),
    }
}

/// GET /categories/{id}
pub async fn get_category(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    match state.catalog.get(path.into_inner()) {
        Ok(category) => HttpResponse::Ok().json(PopulatedCategoryBody {
            success: true,
            category,
        }),
        Err(error) => error_response(&error),
    }
}

/// PUT /categories/{id}
pub async fn update_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let change = CategoryChange {
        name: body.name,
        description: body.description,
        parent: body.parent,
    };
    match state.catalog.update(path.into_inner(), change) {
        Ok(category) => HttpResponse::Ok().json(CategoryBody {
            success: true,
            message: Some("Category updated successfully".to_string()),
            category,
        }),
        Err(error) => error_response(&error),
    }
}

/// DELETE /categories/{id} — cascade.
pub async fn delete_category(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    match state.catalog.delete(path.into_inner()) {
        Ok(_) => HttpResponse::Ok().json(MessageBody {
            success: true,
            message: "Category deleted successfully.".to_string(),
        }),
        Err(error) => error_response(&error),
    }
}

/// GET /categories/{id}/subcategories
pub async fn list_subcategories(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    match state.catalog.get(path.into_inner()) {
        Ok(populated) => HttpResponse::Ok().json(SubcategoryListBody {
            success: true,
            category: ParentRef {
                id: populated.node.id,
                name: populated.node.name,
            },
            subcategories: populated.children,
        }),
        Err(error) => error_response(&error),
    }
}

/// POST /categories/{id}/subcategories — bulk import of a nested subtree.
///
/// Deliberately not transactional: items created before a failure stay in
/// place and are returned alongside the error.
pub async fn create_subcategories(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateSubcategoriesRequest>,
) -> HttpResponse {
    let parent = match state.catalog.get_node(path.into_inner()) {
        Ok(parent) => parent,
        Err(CatalogError::NotFound) => return error_response(&CatalogError::ParentNotFound),
        Err(error) => return error_response(&error),
    };
    let body = body.into_inner();
    if body.subcategories.is_empty() {
        return HttpResponse::BadRequest().json(FailureBody {
            success: false,
            message: "Subcategories must be a non-empty array.".to_string(),
        });
    }
    match import_subtree(&state.catalog, parent.id, &body.subcategories) {
        Ok(subcategories) => HttpResponse::Created().json(SubcategoriesCreatedBody {
            success: true,
            message: "Subcategories created successfully.".to_string(),
            subcategories,
        }),
        Err(failure) => HttpResponse::BadRequest().json(SubcategoriesCreatedBody {
            success: false,
            message: failure.to_string(),
            subcategories: failure.created,
        }),
    }
}

/// PUT /subcategory/{id} — same entity as a category, UI-convenience route.
pub async fn update_subcategory(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let change = CategoryChange {
        name: body.name,
        description: body.description,
        parent: body.parent,
    };
    match state.catalog.update(path.into_inner(), change) {
        Ok(subcategory) => HttpResponse::Ok().json(SubcategoryBody {
            success: true,
            message: "Subcategory updated successfully.".to_string(),
            subcategory,
        }),
        Err(error) => error_response(&error),
    }
}

/// DELETE /subcategory/{id} — cascade, same as the category route.
pub async fn delete_subcategory(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    match state.catalog.delete(path.into_inner()) {
        Ok(_) => HttpResponse::Ok().json(MessageBody {
            success: true,
            message: "Subcategory deleted successfully.".to_string(),
        }),
        Err(error) => error_response(&error),
    }
}
