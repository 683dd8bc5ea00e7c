//! # Marketplace Request DTOs
//!
//! Typed forms of the request schemas in `schemas/deals.yaml`. Each type
//! names its schema through [`RequestSchema::TYPE_NAME`]; the schema is the
//! authority on what is accepted, and these structs only shape the result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::extractors::RequestSchema;

/// An amount in a given ISO 4217 currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    ProgrammaticGuaranteed,
    PreferredDeal,
    PrivateAuction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Draft,
    Proposed,
    Countered,
    Accepted,
    Rejected,
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Targeting {
    #[serde(default)]
    pub geos: Vec<String>,
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub ad_sizes: Vec<String>,
}

/// Body of a new deal proposal from an advertiser to a publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealProposalRequest {
    pub name: String,
    pub deal_type: DealType,
    pub advertiser_id: String,
    pub publisher_id: String,
    pub floor_price: Money,
    pub impressions: Option<u64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub targeting: Option<Targeting>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

impl RequestSchema for DealProposalRequest {
    const TYPE_NAME: &'static str = "DealProposal";
}

/// A deal is referenced by its string id or its legacy numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DealReference {
    Id(String),
    Legacy(i64),
}

/// Body of a counter-offer on an open deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterOfferRequest {
    pub deal_id: DealReference,
    pub price: Money,
    pub impressions: Option<u64>,
    /// Any date-time form the schema accepts, kept as sent.
    pub expires_at: Option<String>,
    pub message: Option<String>,
}

impl RequestSchema for CounterOfferRequest {
    const TYPE_NAME: &'static str = "CounterOffer";
}

/// Query parameters for listing deals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealListQuery {
    pub status: Option<DealStatus>,
    pub advertiser_id: Option<String>,
    pub starts_after: Option<NaiveDate>,
    #[serde(default)]
    pub include_expired: bool,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn first_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl RequestSchema for DealListQuery {
    const TYPE_NAME: &'static str = "DealListQuery";
}
