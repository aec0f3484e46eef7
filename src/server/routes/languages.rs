//! Language Listing Routes

use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::language::Language;
use crate::server::server_core::ServerState;
use crate::server::types::{LanguageInfo, LanguagesResponse};

/// List supported languages and the backends serving each
pub async fn list_languages(State(state): State<Arc<ServerState>>) -> Json<LanguagesResponse> {
    let languages = Language::all()
        .iter()
        .map(|language| {
            let profile = language.profile();
            LanguageInfo {
                code: profile.code().to_string(),
                name: profile.name.to_string(),
                greetings: profile.greetings.iter().map(|g| g.to_string()).collect(),
                native: state.dispatcher.serves_natively(profile),
                cloud: state.dispatcher.serves_via_cloud(profile),
            }
        })
        .collect();

    Json(LanguagesResponse { languages })
}
