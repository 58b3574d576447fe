use crate::models::SupportTicket;
use crate::Result;

use super::{Storage, MAX_TICKETS};

impl Storage {
    pub async fn save_ticket(&self, ticket: SupportTicket) -> Result<SupportTicket> {
        tracing::info!("Support ticket {} from {}", ticket.id, ticket.email);
        let mut tickets = self.tickets.write().await;
        if tickets.len() >= MAX_TICKETS {
            tickets.remove(0);
        }
        tickets.push(ticket.clone());
        Ok(ticket)
    }
    /// Newest first
    pub async fn get_tickets(&self) -> Result<Vec<SupportTicket>> {
        let mut result = self.tickets.read().await.clone();
        result.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(result)
    }
}
