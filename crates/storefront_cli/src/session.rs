//! A console session: one client, one orchestrator, one set of result slots.

use crate::operations::{
    Customer, GetCustomer, GetCustomerVars, ListProducts, ListProductsVars, OrderInput,
    OrderResult, PlaceOrder, PlaceOrderVars, Product, Quote, QuotePrice, QuotePriceVars,
    ReturnInput, ReturnResult, ScheduleReturn, ScheduleReturnVars,
};
use serde::Serialize;
use storefront_sdk::{
    CallOrchestrator, CallState, Client, ClientConfig, OutcomeKind, SdkResult,
};

/// The most recent successful payload of each operation kind.
///
/// Slots are independent: a failed call leaves every slot untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StorefrontResults {
    pub customer: Option<Customer>,
    pub catalog: Option<Vec<Product>>,
    pub quote: Option<Quote>,
    pub order: Option<OrderResult>,
    pub return_request: Option<ReturnResult>,
}

/// Names one result slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSlot {
    Customer,
    Catalog,
    Quote,
    Order,
    Return,
}

impl StorefrontResults {
    /// Renders one slot as JSON; `null` when the slot is empty.
    pub fn slot_json(&self, slot: ResultSlot) -> serde_json::Result<serde_json::Value> {
        match slot {
            ResultSlot::Customer => serde_json::to_value(&self.customer),
            ResultSlot::Catalog => serde_json::to_value(&self.catalog),
            ResultSlot::Quote => serde_json::to_value(&self.quote),
            ResultSlot::Order => serde_json::to_value(&self.order),
            ResultSlot::Return => serde_json::to_value(&self.return_request),
        }
    }
}

pub struct Session {
    client: Client,
    orchestrator: CallOrchestrator<StorefrontResults>,
}

impl Session {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            orchestrator: CallOrchestrator::default(),
        }
    }

    /// Opens a session against the configured endpoint.
    pub fn connect(config: &ClientConfig) -> SdkResult<Self> {
        Ok(Self::new(Client::with_config(config)?))
    }

    pub fn state(&self) -> CallState<StorefrontResults> {
        self.orchestrator.state()
    }

    /// Loads a customer. An unknown id empties the customer slot.
    pub async fn load_customer(&self, id: impl Into<String>) -> SdkResult<OutcomeKind> {
        let vars = GetCustomerVars { id: id.into() };
        self.orchestrator
            .execute(
                || self.client.send_typed::<GetCustomer>(&vars),
                |slots, data| slots.customer = data.customer,
            )
            .await
    }

    pub async fn list_products(
        &self,
        category: Option<String>,
        limit: Option<u32>,
    ) -> SdkResult<OutcomeKind> {
        let vars = ListProductsVars { category, limit };
        self.orchestrator
            .execute(
                || self.client.send_typed::<ListProducts>(&vars),
                |slots, data| slots.catalog = Some(data.products),
            )
            .await
    }

    pub async fn quote_price(
        &self,
        sku: impl Into<String>,
        quantity: u32,
        customer_id: Option<String>,
    ) -> SdkResult<OutcomeKind> {
        let vars = QuotePriceVars {
            sku: sku.into(),
            quantity,
            customer_id,
        };
        self.orchestrator
            .execute(
                || self.client.send_typed::<QuotePrice>(&vars),
                |slots, data| slots.quote = Some(data.quote),
            )
            .await
    }

    pub async fn place_order(&self, input: OrderInput) -> SdkResult<OutcomeKind> {
        let vars = PlaceOrderVars { input };
        self.orchestrator
            .execute(
                || self.client.send_typed::<PlaceOrder>(&vars),
                |slots, data| slots.order = Some(data.place_order),
            )
            .await
    }

    pub async fn schedule_return(&self, input: ReturnInput) -> SdkResult<OutcomeKind> {
        let vars = ScheduleReturnVars { input };
        self.orchestrator
            .execute(
                || self.client.send_typed::<ScheduleReturn>(&vars),
                |slots, data| slots.return_request = Some(data.schedule_return),
            )
            .await
    }
}
