// ── Ticket pricing draft ──

use crate::error::CoreError;
use crate::model::{CategorizedPrice, PricingOption, TicketDetails};

use eventdesk_api::UpdateTicketDetailsRequest;

/// Which part of a price tier an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Type,
    Price,
    Tickets,
}

/// Editable copy of an event's ticket pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDraft {
    details: TicketDetails,
    baseline: TicketDetails,
}

impl TicketDraft {
    pub fn new(details: TicketDetails) -> Self {
        Self {
            baseline: details.clone(),
            details,
        }
    }

    pub fn details(&self) -> &TicketDetails {
        &self.details
    }

    pub fn pricing_option(&self) -> PricingOption {
        self.details.pricing_option
    }

    pub fn set_pricing_option(&mut self, option: PricingOption) {
        self.details.pricing_option = option;
    }

    pub fn toggle_pricing_option(&mut self) {
        self.details.pricing_option = match self.details.pricing_option {
            PricingOption::Flat => PricingOption::Categorized,
            PricingOption::Categorized => PricingOption::Flat,
        };
    }

    pub fn flat_price(&self) -> Option<f64> {
        self.details.flat_price
    }

    pub fn set_flat_price(&mut self, price: Option<f64>) {
        self.details.flat_price = price;
    }

    /// Set the flat price from form text; blank clears it.
    pub fn set_flat_price_text(&mut self, input: &str) -> Result<(), CoreError> {
        let trimmed = input.trim();
        self.details.flat_price = if trimmed.is_empty() {
            None
        } else {
            Some(parse_price(trimmed)?)
        };
        Ok(())
    }

    pub fn categories(&self) -> &[CategorizedPrice] {
        &self.details.categorized_prices
    }

    /// Append a zero-valued tier at the end.
    pub fn add_category(&mut self) {
        self.details
            .categorized_prices
            .push(CategorizedPrice::default());
    }

    /// Remove the tier at `index`, if it exists.
    pub fn remove_category(&mut self, index: usize) -> Option<CategorizedPrice> {
        (index < self.details.categorized_prices.len())
            .then(|| self.details.categorized_prices.remove(index))
    }

    /// Change one field of one tier in place.
    pub fn update_category(
        &mut self,
        index: usize,
        field: CategoryField,
        input: &str,
    ) -> Result<(), CoreError> {
        let tier = self
            .details
            .categorized_prices
            .get_mut(index)
            .ok_or_else(|| CoreError::validation(format!("no price category at row {index}")))?;

        match field {
            CategoryField::Type => input.clone_into(&mut tier.category),
            CategoryField::Price => tier.price = parse_price(input.trim())?,
            CategoryField::Tickets => {
                tier.number_of_tickets = input.trim().parse().map_err(|_| {
                    CoreError::validation(format!(
                        "ticket count must be a whole number, got {input:?}"
                    ))
                })?;
            }
        }
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.details != self.baseline
    }

    /// Record what the server now holds. Later edits stay dirty.
    pub fn mark_saved(&mut self, saved: TicketDetails) {
        self.baseline = saved;
    }

    /// Check the shape selected by `pricing_option` before submitting.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self.details.pricing_option {
            PricingOption::Flat => match self.details.flat_price {
                None => Err(CoreError::validation("a flat price is required")),
                Some(p) if p < 0.0 => Err(CoreError::validation("price must not be negative")),
                Some(_) => Ok(()),
            },
            PricingOption::Categorized => {
                if self.details.categorized_prices.is_empty() {
                    return Err(CoreError::validation("add at least one price category"));
                }
                for (row, tier) in self.details.categorized_prices.iter().enumerate() {
                    if tier.category.trim().is_empty() {
                        return Err(CoreError::validation(format!(
                            "category {} needs a name",
                            row + 1
                        )));
                    }
                    if tier.price < 0.0 {
                        return Err(CoreError::validation(format!(
                            "category {:?} has a negative price",
                            tier.category
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    /// Body for `update-ticket-details`. Only the active price shape is sent.
    pub fn to_request(&self, event_id: &str) -> UpdateTicketDetailsRequest {
        let (flat_price, categorized_prices) = match self.details.pricing_option {
            PricingOption::Flat => (self.details.flat_price, None),
            PricingOption::Categorized => (
                None,
                Some(
                    self.details
                        .categorized_prices
                        .iter()
                        .map(|tier| CategorizedPrice {
                            category: tier.category.trim().to_owned(),
                            ..tier.clone()
                        })
                        .collect(),
                ),
            ),
        };
        UpdateTicketDetailsRequest {
            event_id: event_id.to_owned(),
            pricing_option: self.details.pricing_option,
            flat_price,
            categorized_prices,
        }
    }
}

fn parse_price(input: &str) -> Result<f64, CoreError> {
    input
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| CoreError::validation(format!("price must be a number, got {input:?}")))
}
