use axum::extract::FromRequest;
use crate::errors::AppError;

// Body extractors whose rejections go through AppError, so malformed bodies get the JSON error shape

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct AppForm<T>(pub T);
