// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

mod categories;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(categories::list_categories))
            .route("", web::post().to(categories::create_category))
            .route(
                "/{id}/subcategories",
                web::get().to(categories::list_subcategories),
            )
            .route(
                "/{id}/subcategories",
                web::post().to(categories::create_subcategories),
            )
            .route("/{id}", web::get().to(categories::get_category))
            .route("/{id}", web::put().to(categories::update_category))
            .route("/{id}", web::delete().to(categories::delete_category)),
    )
    .service(
        web::scope("/subcategory")
            .route("/{id}", web::put().to(categories::update_subcategory))
            .route("/{id}", web::delete().to(categories::delete_subcategory)),
    );
}
