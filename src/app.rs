use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    interface::http::{
        auth_handler::{healthcheck, login, me},
        sales_handler::{create_sale, get_sale, sales_history},
        users_handler::{
            create_client, create_employee, delete_client, delete_employee, get_client,
            get_client_by_cpf, get_employee, get_employee_by_cpf, list_clients, list_employees,
            update_client, update_employee,
        },
        vehicles_handler::{
            create_vehicle, delete_vehicle, get_vehicle, list_vehicles, update_vehicle,
        },
    },
    state::AppState,
};

pub fn build_router(state: AppState, cors_origin: HeaderValue) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .route("/health", get(healthcheck))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/clientes", post(create_client).get(list_clients))
        .route("/clientes/cpf/{cpf}", get(get_client_by_cpf))
        .route(
            "/clientes/{id}",
            get(get_client)
                .put(update_client)
                .patch(update_client)
                .delete(delete_client),
        )
        .route("/funcionarios", post(create_employee).get(list_employees))
        .route("/funcionarios/cpf/{cpf}", get(get_employee_by_cpf))
        .route(
            "/funcionarios/{id}",
            get(get_employee)
                .put(update_employee)
                .patch(update_employee)
                .delete(delete_employee),
        )
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/{id}",
            get(get_vehicle)
                .put(update_vehicle)
                .patch(update_vehicle)
                .delete(delete_vehicle),
        )
        .route("/vendas", post(create_sale))
        .route("/vendas/{id}", get(get_sale))
        .route("/historico", get(sales_history))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header.clone(), MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(cors_origin)
                .allow_credentials(true)
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .expose_headers([request_id_header])
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ]),
        )
        .with_state(state)
}
