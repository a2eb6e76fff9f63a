use shared::form::schema::{FeedbackUpiForm, validate_form};
use shared::models::StoreFeedbackUpi;

use super::{StepContext, StepOutcome, StepResult, advance, request_error, step_back};
use crate::cache::QueryKey;
use crate::mode::Mode;
use crate::notice::Notice;

/// Step 3: optional review link and UPI id
pub struct FeedbackUpiStep {
    mode: Mode,
    ctx: StepContext,
    form: FeedbackUpiForm,
}

impl FeedbackUpiStep {
    pub async fn open(mode: Mode, ctx: StepContext) -> StepResult<Self> {
        let form = match mode {
            Mode::Create => FeedbackUpiForm::from_form_data(&ctx.session.form_data()),
            Mode::Update(store_id) => {
                let store = ctx.store.clone();
                let slice: StoreFeedbackUpi = ctx
                    .cache
                    .get_or_fetch(QueryKey::FeedbackUpi(store_id), || async move {
                        store.feedback_upi(store_id).await
                    })
                    .await
                    .map_err(request_error("Fetch store error:"))?;
                FeedbackUpiForm::new(
                    slice.feedback_link.unwrap_or_default(),
                    slice.upi_id.unwrap_or_default(),
                )
            }
        };
        Ok(Self { mode, ctx, form })
    }

    pub fn form(&self) -> &FeedbackUpiForm {
        &self.form
    }

    pub fn on_change(&mut self, form: FeedbackUpiForm) {
        self.form = form;
        if self.mode == Mode::Create {
            self.ctx.session.update_form_data(self.form.to_patch());
        }
    }

    pub async fn submit(&mut self) -> StepResult<StepOutcome> {
        validate_form(&self.form)?;
        let Mode::Update(store_id) = self.mode else {
            return Ok(advance(&self.ctx));
        };

        // Blank fields clear the stored value
        let payload = StoreFeedbackUpi {
            feedback_link: self.form.feedback_link_value(),
            upi_id: self.form.upi_id_value(),
        };
        let updated = self
            .ctx
            .store
            .update_feedback_upi(store_id, &payload)
            .await
            .map_err(request_error("Update store error:"))?;
        self.ctx.cache.set(
            QueryKey::FeedbackUpi(store_id),
            StoreFeedbackUpi {
                feedback_link: updated.feedback_link,
                upi_id: updated.upi_id,
            },
        );
        tracing::info!(store_id, "Feedback link and UPI id saved");
        Ok(StepOutcome::Saved(Notice::success("Updated successfully")))
    }

    pub fn back(&self) -> StepOutcome {
        step_back(self.mode, &self.ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Navigation;
    use crate::steps::testing::{Harness, STORE_ID};

    #[tokio::test]
    async fn test_both_fields_optional() {
        let h = Harness::new();
        h.ctx.session.next_step();
        h.ctx.session.next_step();
        let mut step = FeedbackUpiStep::open(Mode::Create, h.ctx.clone()).await.unwrap();
        assert_eq!(step.submit().await.unwrap(), StepOutcome::Moved(4));
        assert_eq!(step.back(), StepOutcome::Moved(3));
    }

    #[tokio::test]
    async fn test_bad_upi_id_rejected() {
        let h = Harness::new();
        let mut step = FeedbackUpiStep::open(Mode::Create, h.ctx.clone()).await.unwrap();
        step.on_change(FeedbackUpiForm::new("", "joe@@cafe"));
        let err = step.submit().await.unwrap_err();
        assert!(err.field_errors().unwrap().contains("upi_id"));
        assert_eq!(h.ctx.session.form_data().upi_id, "joe@@cafe");
    }

    #[tokio::test]
    async fn test_update_clears_blank_upi() {
        let h = Harness::new();
        let mut step = FeedbackUpiStep::open(Mode::Update(STORE_ID), h.ctx.clone())
            .await
            .unwrap();
        assert_eq!(step.form().feedback_link, "https://g.page/joe/review");
        assert_eq!(step.form().upi_id, "");

        step.on_change(FeedbackUpiForm::new("", "joescafe@okaxis"));
        assert!(matches!(step.submit().await.unwrap(), StepOutcome::Saved(_)));

        let cached: StoreFeedbackUpi = h.ctx.cache.get(&QueryKey::FeedbackUpi(STORE_ID)).unwrap();
        assert_eq!(cached.feedback_link, None);
        assert_eq!(cached.upi_id.as_deref(), Some("joescafe@okaxis"));
        assert_eq!(step.back(), StepOutcome::Navigate(Navigation::Back));
    }
}
