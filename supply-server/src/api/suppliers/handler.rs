//! Supplier API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use uuid::Uuid;

use crate::core::ServerState;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Supplier, SupplierCreate, SupplierUpdate};

fn validate_contact_fields(
    contact_name: &Option<String>,
    phone: &Option<String>,
    email: &Option<String>,
    address: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(contact_name, "contact_name", MAX_NAME_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    Ok(())
}

/// GET /api/suppliers - 获取所有供应商
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = state.store.list_suppliers().await?;
    Ok(Json(suppliers))
}

/// GET /api/suppliers/{id} - 获取单个供应商
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Supplier>> {
    let supplier = state
        .store
        .get_supplier(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Supplier {} not found", id)))?;
    Ok(Json(supplier))
}

/// POST /api/suppliers - 创建供应商
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SupplierCreate>,
) -> AppResult<Json<Supplier>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_contact_fields(
        &payload.contact_name,
        &payload.phone,
        &payload.email,
        &payload.address,
    )?;

    let supplier = Supplier {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        contact_name: payload.contact_name,
        phone: payload.phone,
        email: payload.email,
        address: payload.address,
        is_active: true,
        created_at: Utc::now(),
    };
    let supplier = state.store.create_supplier(supplier).await?;
    tracing::info!(supplier_id = %supplier.id, name = %supplier.name, "Supplier created");
    Ok(Json(supplier))
}

/// PUT /api/suppliers/{id} - 更新供应商
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SupplierUpdate>,
) -> AppResult<Json<Supplier>> {
    let mut supplier = state
        .store
        .get_supplier(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Supplier {} not found", id)))?;

    if let Some(name) = payload.name {
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        supplier.name = name;
    }
    validate_contact_fields(
        &payload.contact_name,
        &payload.phone,
        &payload.email,
        &payload.address,
    )?;
    if payload.contact_name.is_some() {
        supplier.contact_name = payload.contact_name;
    }
    if payload.phone.is_some() {
        supplier.phone = payload.phone;
    }
    if payload.email.is_some() {
        supplier.email = payload.email;
    }
    if payload.address.is_some() {
        supplier.address = payload.address;
    }
    if let Some(is_active) = payload.is_active {
        supplier.is_active = is_active;
    }

    let supplier = state.store.update_supplier(supplier).await?;
    Ok(Json(supplier))
}

/// DELETE /api/suppliers/{id} - 删除供应商
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = state.store.delete_supplier(&id).await?;
    if result {
        tracing::info!(supplier_id = %id, "Supplier deleted");
    }
    Ok(Json(result))
}
