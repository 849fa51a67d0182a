//! Storefront operations and their payloads.

use serde::{Deserialize, Serialize};
use storefront_sdk::{OperationKind, TypedOperation};

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub sku: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub order_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResult {
    pub return_id: String,
    pub status: String,
    pub scheduled_at: String,
    #[serde(default)]
    pub refund_amount: Option<f64>,
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub customer_id: String,
    pub sku: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnInput {
    pub order_id: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<String>,
}

// ============================================================================
// Operations
// ============================================================================

/// Looks up one customer; `customer` is null when the id is unknown.
pub struct GetCustomer;

#[derive(Debug, Clone, Serialize)]
pub struct GetCustomerVars {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetCustomerData {
    pub customer: Option<Customer>,
}

impl TypedOperation for GetCustomer {
    type Variables = GetCustomerVars;
    type Response = GetCustomerData;
    const OPERATION: &'static str =
        "query GetCustomer($id: ID!) { customer(id: $id) { id name email tier } }";
    const OPERATION_NAME: &'static str = "GetCustomer";
    const KIND: OperationKind = OperationKind::Query;
}

/// Lists catalog products, optionally filtered by category.
pub struct ListProducts;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListProductsVars {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListProductsData {
    pub products: Vec<Product>,
}

impl TypedOperation for ListProducts {
    type Variables = ListProductsVars;
    type Response = ListProductsData;
    const OPERATION: &'static str = "query ListProducts($category: String, $limit: Int) { \
        products(category: $category, limit: $limit) { sku name category price stock } }";
    const OPERATION_NAME: &'static str = "ListProducts";
    const KIND: OperationKind = OperationKind::Query;
}

/// Prices a quantity of one product, with customer-specific discounts.
pub struct QuotePrice;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePriceVars {
    pub sku: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotePriceData {
    pub quote: Quote,
}

impl TypedOperation for QuotePrice {
    type Variables = QuotePriceVars;
    type Response = QuotePriceData;
    const OPERATION: &'static str =
        "query QuotePrice($sku: String!, $quantity: Int!, $customerId: ID) { \
        quote(sku: $sku, quantity: $quantity, customerId: $customerId) { \
        sku quantity unitPrice discount total } }";
    const OPERATION_NAME: &'static str = "QuotePrice";
    const KIND: OperationKind = OperationKind::Query;
}

pub struct PlaceOrder;

#[derive(Debug, Clone, Serialize)]
pub struct PlaceOrderVars {
    pub input: OrderInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderData {
    pub place_order: OrderResult,
}

impl TypedOperation for PlaceOrder {
    type Variables = PlaceOrderVars;
    type Response = PlaceOrderData;
    const OPERATION: &'static str = "mutation PlaceOrder($input: OrderInput!) { \
        placeOrder(input: $input) { orderId status } }";
    const OPERATION_NAME: &'static str = "PlaceOrder";
    const KIND: OperationKind = OperationKind::Mutation;
}

pub struct ScheduleReturn;

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReturnVars {
    pub input: ReturnInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReturnData {
    pub schedule_return: ReturnResult,
}

impl TypedOperation for ScheduleReturn {
    type Variables = ScheduleReturnVars;
    type Response = ScheduleReturnData;
    const OPERATION: &'static str = "mutation ScheduleReturn($input: ReturnInput!) { \
        scheduleReturn(input: $input) { returnId status scheduledAt refundAmount } }";
    const OPERATION_NAME: &'static str = "ScheduleReturn";
    const KIND: OperationKind = OperationKind::Mutation;
}
