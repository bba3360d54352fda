//! Transient notices.
//!
//! Notices stack in a holder column along the right edge of the active
//! screen. Each one stays for the configured hold time, fades out (with the
//! `notice-fade` feature), collapses to zero height and destroys itself from
//! the collapse task's completion callback. Both tasks are scheduled up front
//! with delays, so nothing chains through callbacks except the final destroy.

use crate::anim::{Anim, AnimProp};
use crate::config::NoticeConfig;
use crate::error::UiResult;
use crate::layout::{Align, Fit, Layout};
use crate::obj::{ObjId, ObjKind};
use crate::Ui;
use tracing::{debug, warn};

impl Ui {
    /// Show `text` as a notice. Returns the notice object.
    ///
    /// On failure the half-built notice is removed again; the holder stays.
    pub fn add_notice(&mut self, text: &str) -> UiResult<ObjId> {
        let holder = self.notice_holder()?;
        self.tree.move_foreground(holder)?;
        let notice = self.tree.create(ObjKind::Base, Some(holder), None)?;
        let height = match self.build_notice(notice, text) {
            Ok(height) => height,
            Err(err) => {
                self.destroy(notice)?;
                return Err(err);
            }
        };

        let NoticeConfig {
            hold_ms,
            fade_ms,
            collapse_ms,
        } = self.config.notice;

        #[cfg(feature = "notice-fade")]
        let collapse_delay = {
            use crate::style::OPA_TRANSP;
            let opa = self.tree.opa(notice)?;
            self.anims.schedule(
                Anim::prop(notice, AnimProp::Opa)
                    .values(opa as i32, OPA_TRANSP as i32)
                    .time(fade_ms)
                    .delay(hold_ms),
            );
            hold_ms.saturating_add(fade_ms)
        };
        #[cfg(not(feature = "notice-fade"))]
        let collapse_delay = {
            let _ = fade_ms;
            hold_ms
        };

        self.anims.schedule(
            Anim::prop(notice, AnimProp::Height)
                .values(height as i32, 0)
                .time(collapse_ms)
                .delay(collapse_delay)
                .on_complete(|ctx, id| {
                    if let Err(err) = ctx.destroy(id) {
                        warn!("Notice {} already gone: {}", id, err);
                    }
                }),
        );
        debug!("Notice {} \"{}\"", notice, text);
        Ok(notice)
    }

    /// Fill in a fresh notice and freeze its size. Returns its height.
    fn build_notice(&mut self, notice: ObjId, text: &str) -> UiResult<u32> {
        let body = self.tree.theme().notice.clone();
        let text_style = self.tree.theme().notice_label.clone();

        self.tree.set_style(notice, body)?;
        self.tree.set_click(notice, false)?;
        self.tree.set_layout(notice, Layout::Column(Align::Start))?;
        self.tree.set_fit(notice, Fit::Shrink, Fit::Shrink)?;

        let label = self.tree.create(ObjKind::Label, Some(notice), None)?;
        self.tree.set_style(label, text_style)?;
        self.tree.set_text(label, text)?;

        // Resolve the shrink fit once, then keep that size so the collapse
        // can drive the height.
        self.tree.refresh_layout()?;
        let size = self.tree.obj(notice)?.area().size;
        self.tree.set_fit(notice, Fit::Fixed, Fit::Fixed)?;
        self.tree.set_size(notice, size.width, size.height)?;
        Ok(size.height)
    }

    /// Holder column on the active screen, created on first use.
    fn notice_holder(&mut self) -> UiResult<ObjId> {
        let screen = match self.tree.active_screen() {
            Some(screen) => screen,
            None => self.tree.create(ObjKind::Base, None, None)?,
        };
        if let Some(holder) = self.notice_holder {
            if self.tree.screen_of(holder).ok() == Some(screen) {
                return Ok(holder);
            }
        }

        let holder = self.tree.create(ObjKind::Base, Some(screen), None)?;
        let width = self.tree.screen_size().width;
        let transparent = self.tree.theme().transparent.clone();
        let setup = (|| {
            self.tree.set_style(holder, transparent)?;
            self.tree.set_click(holder, false)?;
            self.tree.set_layout(holder, Layout::Column(Align::End))?;
            self.tree.set_size(holder, width, 0)?;
            self.tree.set_fit(holder, Fit::Fixed, Fit::Shrink)
        })();
        if let Err(err) = setup {
            self.destroy(holder)?;
            return Err(err);
        }
        self.notice_holder = Some(holder);
        Ok(holder)
    }
}
