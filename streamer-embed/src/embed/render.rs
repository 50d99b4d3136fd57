use streamer_platforms::StreamerStatus;
use tracing::{debug, info};

use super::{DirectiveOutput, PageContext, StreamerEmbed};
use crate::Result;
use crate::database::ClaimDbModel;
use crate::params::{STREAMER_SCHEMA, ValidatedParameters, ValidationError};
use crate::template::{TemplateVariables, escape_html};

/// Error box shown in place of the widget.
pub(crate) fn error_box(errors: &[ValidationError]) -> String {
    let messages: Vec<String> = errors.iter().map(|e| escape_html(&e.to_string())).collect();
    format!(
        "<div class='errorbox'><strong>Streamer {}</strong><br/>{}</div>",
        env!("CARGO_PKG_VERSION"),
        messages.join("<br/>\n")
    )
}

impl StreamerEmbed {
    /// Resolve the adapter and fetch (or reuse) the status for validated parameters.
    async fn lookup_status(
        &self,
        params: &ValidatedParameters,
    ) -> std::result::Result<StreamerStatus, ValidationError> {
        let (service, user) = (params.service(), params.user());
        let invalid_user = || ValidationError::InvalidUser {
            service: service.to_owned(),
            user: user.to_owned(),
        };

        let mut streamer =
            self.registry
                .resolve(service)
                .map_err(|_| ValidationError::ProviderUnavailable {
                    service: service.to_owned(),
                })?;

        if !streamer.set_user(user).await {
            return Err(invalid_user());
        }
        streamer.status().cloned().ok_or_else(invalid_user)
    }

    /// Expand `#streamer`: the live status widget.
    ///
    /// Argument problems render as an error box. Storage failures are returned.
    pub async fn render_streamer<I, S>(&self, args: I) -> Result<DirectiveOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let params = match STREAMER_SCHEMA.validate(args) {
            Ok(params) => params,
            Err(errors) => return Ok(DirectiveOutput::markup(error_box(&errors))),
        };

        let status = match self.lookup_status(&params).await {
            Ok(status) => status,
            Err(error) => return Ok(DirectiveOutput::markup(error_box(&[error]))),
        };

        let claim = self.claims.find(params.service(), params.user()).await?;

        let name = claim
            .as_ref()
            .map(|c| c.display_name.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| status.name.clone())
            .unwrap_or_default();

        let link = match params.link() {
            Some(link) => link.to_owned(),
            None => claim
                .as_ref()
                .map(|c| c.page_link(&self.page_url_pattern))
                .or_else(|| status.channel_url.clone())
                .unwrap_or_default(),
        };

        let variables = TemplateVariables::new(&status, &name, &link);
        let html = self
            .renderer
            .render(params.template(), &variables)
            .unwrap_or_else(|| {
                debug!(template = params.template(), "unknown template, rendering nothing");
                String::new()
            });

        Ok(DirectiveOutput::markup(html))
    }

    /// Expand `#streamerinfo`: record that `page` speaks for the streamer.
    ///
    /// Produces no markup unless the arguments are bad. Preview renders do nothing.
    pub async fn render_streamer_info<I, S>(
        &self,
        page: &PageContext,
        args: I,
    ) -> Result<DirectiveOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if page.is_preview {
            return Ok(DirectiveOutput::literal(String::new()));
        }

        let params = match STREAMER_SCHEMA.validate(args) {
            Ok(params) => params,
            Err(errors) => return Ok(DirectiveOutput::literal(error_box(&errors))),
        };

        if let Err(error) = self.lookup_status(&params).await {
            return Ok(DirectiveOutput::literal(error_box(&[error])));
        }

        let claim = ClaimDbModel::new(
            params.service(),
            params.user(),
            page.root_title(),
            page.title.as_str(),
        );
        self.claims.save(&claim).await?;
        info!(
            service = %claim.service,
            user = %claim.user,
            page = %claim.page_title,
            "claim saved"
        );

        Ok(DirectiveOutput::literal(String::new()))
    }
}
