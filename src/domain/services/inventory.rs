//! Pure inventory arithmetic. Callers persist the mutated `Event` together with
//! the booking write so both land in one transaction.

use crate::domain::models::{booking::BookedTicket, event::Event};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub total_amount: f64,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Restoration {
    pub restored_quantity: i64,
    pub unrestored: Vec<BookedTicket>,
}

pub fn validate_line_items(lines: &[BookedTicket]) -> Result<(), AppError> {
    if lines.is_empty() {
        return Err(AppError::Validation("Event ID and non-empty array ticket are required.".into()));
    }
    if lines.iter().any(|l| l.ticket_type_name.trim().is_empty() || l.quantity < 1) {
        return Err(AppError::Validation(
            "Each ticket entry must include a valid ticketTypeName and a ticketQuantity of at least 1.".into(),
        ));
    }
    Ok(())
}

/// Draws `lines` down from the event's inventory.
///
/// Every line is checked before anything is decremented, so on error `event`
/// is left untouched. Lines naming the same ticket type are checked against
/// their combined quantity.
pub fn reserve(event: &mut Event, lines: &[BookedTicket]) -> Result<Reservation, AppError> {
    validate_line_items(lines)?;

    let mut requested = vec![0u64; event.ticket_types.len()];
    let mut resolved = Vec::with_capacity(lines.len());

    for line in lines {
        let idx = event.find_ticket_type(&line.ticket_type_name).ok_or_else(|| {
            AppError::NotFound(format!("Ticket type '{}' not found for this event.", line.ticket_type_name))
        })?;

        requested[idx] += line.quantity as u64;
        let available = event.ticket_types[idx].quantity;
        if requested[idx] > available as u64 {
            return Err(AppError::InsufficientInventory(format!(
                "Not enough tickets available for type '{}'. Only {} left.",
                line.ticket_type_name, available
            )));
        }
        resolved.push((idx, line.quantity));
    }

    let mut total_amount = 0.0;
    let mut total_quantity = 0i64;
    for (idx, quantity) in resolved {
        let ticket_type = &mut event.ticket_types[idx];
        total_amount += ticket_type.price * quantity as f64;
        total_quantity += quantity as i64;
        ticket_type.quantity -= quantity;
    }

    event.tickets_sold += total_quantity;
    event.recount_available();

    Ok(Reservation { total_amount, total_quantity })
}

/// Puts booked quantities back into the event's inventory.
///
/// Lines whose ticket type no longer exists cannot be restored and are
/// returned in `unrestored`. `tickets_sold` still drops by the full booked
/// quantity since the sale itself is being undone.
pub fn restore(event: &mut Event, lines: &[BookedTicket]) -> Restoration {
    let mut restored_quantity = 0i64;
    let mut booked_quantity = 0i64;
    let mut unrestored = Vec::new();

    for line in lines {
        booked_quantity += line.quantity as i64;
        match event.find_ticket_type(&line.ticket_type_name) {
            Some(idx) => {
                let ticket_type = &mut event.ticket_types[idx];
                ticket_type.quantity = ticket_type.quantity.saturating_add(line.quantity);
                restored_quantity += line.quantity as i64;
            }
            None => unrestored.push(line.clone()),
        }
    }

    event.tickets_sold = (event.tickets_sold - booked_quantity).max(0);
    event.recount_available();

    Restoration { restored_quantity, unrestored }
}
