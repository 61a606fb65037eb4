use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::company::CompanyRef;
use crate::contact::ContactRef;
use crate::deal::DealRef;

/// Lookup lists that populate foreign-key selectors on a form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReferenceLists {
    pub companies: Vec<CompanyRef>,
    pub contacts: Vec<ContactRef>,
    pub deals: Vec<DealRef>,
}

impl ReferenceLists {
    /// Contacts offered once a company is chosen; everything when none is.
    pub fn contacts_for<'a>(&'a self, company_id: &'a str) -> impl Iterator<Item = &'a ContactRef> {
        self.contacts.iter().filter(move |contact| {
            company_id.is_empty() || contact.company_id.as_deref() == Some(company_id)
        })
    }

    /// Deals offered once a company is chosen; everything when none is.
    pub fn deals_for<'a>(&'a self, company_id: &'a str) -> impl Iterator<Item = &'a DealRef> {
        self.deals.iter().filter(move |deal| {
            company_id.is_empty() || deal.company_id.as_deref() == Some(company_id)
        })
    }
}
