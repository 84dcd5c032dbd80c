//! API route configuration.

use crate::api::handlers::{
    create_filter_handler, create_ownership_handler, create_patent_handler,
    create_person_handler, delete_filter_handler, delete_ownership_handler,
    delete_patent_handler, delete_person_handler, export_patents_handler, get_filter_handler,
    get_patent_handler, get_person_handler, list_filters_handler, list_ownerships_handler,
    list_patents_handler, patents_stats_handler, persons_all_stats_handler,
    persons_breakdown_handler, persons_msk_stats_handler, update_patent_handler,
    update_person_handler, upload_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Registry routes. None of them require authentication.
///
/// # Endpoints
///
/// - `GET    /patents`                        - Paginated patent list with holders
/// - `POST   /patents`                        - Create a patent
/// - `GET    /patents/stats`                  - Patent statistics (cached)
/// - `GET    /patents/export`                 - CSV export via the export worker
/// - `GET    /patents/{kind}/{reg_number}`    - Patent with holders
/// - `PATCH  /patents/{kind}/{reg_number}`    - Partial update
/// - `DELETE /patents/{kind}/{reg_number}`    - Delete (ownerships cascade)
/// - `POST   /uploadfile`                     - CSV import (multipart `file`)
/// - `GET    /persons`                        - OKOPF/OKVED/MPK breakdown (cached)
/// - `POST   /persons`                        - Create a person
/// - `GET    /persons/all_stats`              - Person statistics (cached)
/// - `GET    /persons/msk_stats`              - Moscow person statistics (cached)
/// - `GET    /persons/{tax_number}`           - Person with patents
/// - `PATCH  /persons/{tax_number}`           - Partial update
/// - `DELETE /persons/{tax_number}`           - Delete (ownerships cascade)
/// - `GET    /ownerships`, `POST /ownerships`, `DELETE /ownerships/{id}`
/// - `GET    /filters`, `POST /filters`, `GET|DELETE /filters/{id}`
pub fn registry_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/patents",
            get(list_patents_handler).post(create_patent_handler),
        )
        .route("/patents/stats", get(patents_stats_handler))
        .route("/patents/export", get(export_patents_handler))
        .route(
            "/patents/{kind}/{reg_number}",
            get(get_patent_handler)
                .patch(update_patent_handler)
                .delete(delete_patent_handler),
        )
        .route("/uploadfile", post(upload_handler))
        .route(
            "/persons",
            get(persons_breakdown_handler).post(create_person_handler),
        )
        .route("/persons/all_stats", get(persons_all_stats_handler))
        .route("/persons/msk_stats", get(persons_msk_stats_handler))
        .route(
            "/persons/{tax_number}",
            get(get_person_handler)
                .patch(update_person_handler)
                .delete(delete_person_handler),
        )
        .route(
            "/ownerships",
            get(list_ownerships_handler).post(create_ownership_handler),
        )
        .route("/ownerships/{id}", delete(delete_ownership_handler))
        .route(
            "/filters",
            get(list_filters_handler).post(create_filter_handler),
        )
        .route(
            "/filters/{id}",
            get(get_filter_handler).delete(delete_filter_handler),
        )
}
