//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Message-only acknowledgement (newsletter).
#[derive(Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: &'static str,
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::OK,
        Json(SuccessOne {
            success: true,
            data,
            message: None,
        }),
    )
}

pub fn success_one_created<T: Serialize>(data: T, message: &'static str) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::CREATED,
        Json(SuccessOne {
            success: true,
            data,
            message: Some(message),
        }),
    )
}

pub fn success_page<T: Serialize>(data: Vec<T>, total: u64, limit: u32, offset: u32) -> (StatusCode, Json<SuccessMany<T>>) {
    (
        StatusCode::OK,
        Json(SuccessMany {
            success: true,
            data,
            meta: PageMeta { total, limit, offset },
        }),
    )
}

pub fn ack(status: StatusCode, message: &'static str) -> (StatusCode, Json<Ack>) {
    (status, Json(Ack { success: true, message }))
}
