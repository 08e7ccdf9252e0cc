use tracing::{debug, info, warn};

use super::Marketplace;
use crate::error::{DomainResult, Error};
use crate::models::{Property, User};
use crate::wizard::{PropertyDraft, StepData};

impl Marketplace {
    pub fn create_draft(&self, owner: &User) -> DomainResult<PropertyDraft> {
        if !owner.can_list_properties() {
            return Err(Error::forbidden("only owners can list properties"));
        }
        let draft = PropertyDraft::new(&owner.id);
        self.store.drafts.insert(draft.clone())?;
        debug!("{} started draft {}", owner.id, draft.id);
        Ok(draft)
    }

    pub fn list_drafts(&self, owner: &User) -> Vec<PropertyDraft> {
        let mut drafts = self.store.drafts.find(|d| d.owner_id == owner.id);
        drafts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        drafts
    }

    /// Drafts are private; other users get NotFound.
    pub fn get_draft(&self, owner: &User, draft_id: &str) -> DomainResult<PropertyDraft> {
        let draft = self.store.drafts.get(draft_id)?;
        ensure_owner(owner, &draft)?;
        Ok(draft)
    }

    pub fn discard_draft(&self, owner: &User, draft_id: &str) -> DomainResult<()> {
        self.get_draft(owner, draft_id)?;
        self.store.drafts.remove(draft_id)?;
        Ok(())
    }

    pub fn submit_draft_step(
        &self,
        owner: &User,
        draft_id: &str,
        data: StepData,
    ) -> DomainResult<PropertyDraft> {
        self.store
            .drafts
            .update(draft_id, |d| -> DomainResult<PropertyDraft> {
                ensure_owner(owner, d)?;
                d.submit(data)?;
                Ok(d.clone())
            })
    }

    pub fn draft_back(&self, owner: &User, draft_id: &str) -> DomainResult<PropertyDraft> {
        self.store
            .drafts
            .update(draft_id, |d| -> DomainResult<PropertyDraft> {
                ensure_owner(owner, d)?;
                d.back();
                Ok(d.clone())
            })
    }

    /// Turn a completed draft into a listing awaiting review.
    ///
    /// The draft is taken out of the store before the property is created,
    /// so concurrent finishes yield one listing. It is put back if creation
    /// fails.
    pub fn finish_draft(&self, owner: &User, draft_id: &str) -> DomainResult<Property> {
        let new = self.get_draft(owner, draft_id)?.to_new_property()?;
        let draft = self.store.drafts.remove(draft_id)?;

        match self.create_property(owner, new) {
            Ok(property) => {
                info!("Draft {} became property {}", draft_id, property.id);
                Ok(property)
            }
            Err(err) => {
                if let Err(restore) = self.store.drafts.insert(draft) {
                    warn!("Could not restore draft {}: {}", draft_id, restore);
                }
                Err(err)
            }
        }
    }
}

fn ensure_owner(user: &User, draft: &PropertyDraft) -> DomainResult<()> {
    if draft.owner_id != user.id {
        return Err(Error::not_found(format!("drafts {}", draft.id)));
    }
    Ok(())
}
