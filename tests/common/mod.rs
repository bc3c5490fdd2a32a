// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use std::sync::Arc;

use stockyard::api;
use stockyard::app_state::AppState;
use stockyard::catalog::YamlCategoryStore;
use stockyard::config::ValidatedConfig;
use stockyard::runtime_paths::RuntimePaths;
use stockyard::test_fixtures::TestFixtureRoot;

/// Throwaway runtime root for one test, with config and store bootstrapped
/// the same way the server does it. The fixture root cleans up after
/// itself on drop.
pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: ValidatedConfig,
    pub runtime_paths: RuntimePaths,
    pub app_state: web::Data<AppState>,
}

impl TestHarness {
    pub fn new() -> Self {
        let fixture = TestFixtureRoot::new_unique("harness").expect("fixture root");
        let runtime_paths = fixture.runtime_paths().expect("runtime paths");
        let (config, _created) =
            ValidatedConfig::load_or_create(&runtime_paths.config_file).expect("config");
        let categories = Arc::new(
            YamlCategoryStore::open(runtime_paths.categories_file.clone()).expect("store"),
        );
        let app_state = web::Data::new(AppState::new(categories, runtime_paths.clone()));
        Self {
            fixture,
            config,
            runtime_paths,
            app_state,
        }
    }
}

pub fn build_test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(harness.app_state.clone())
        .app_data(web::Data::new(harness.config.clone()))
        .configure(api::configure)
}
