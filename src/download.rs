use std::time::Duration;

use anyhow::Context;
use once_cell::sync::Lazy;
use reqwest::redirect::Policy;
use reqwest::IntoUrl;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoffBuilder;
use reqwest_retry::RetryTransientMiddleware;

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

const MAX_REDIRECTS: u32 = 10;

pub(crate) static DEFAULT_RETRY_CLIENT_NO_REDIRECT: Lazy<ClientWithMiddleware> = Lazy::new(|| {
    let client = reqwest::Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .connect_timeout(Duration::from_secs(20))
        .timeout(Duration::from_secs(60))
        .redirect(Policy::none()) // redirects handled in get_response
        .build()
        .unwrap();

    let retry_policy = ExponentialBackoffBuilder::default()
        .retry_bounds(Duration::from_secs(1), Duration::from_secs(10))
        .build_with_max_retries(5);

    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
});

pub(crate) async fn get_response<U: IntoUrl>(
    url: U,
    user_agent: Option<&str>,
    referer: Option<&str>,
) -> Result<reqwest::Response, anyhow::Error> {
    // We need to handle redirects ourself, because reqwest changes the Referer
    // header on redirection
    let client = &*DEFAULT_RETRY_CLIENT_NO_REDIRECT;
    let mut last_url = url.as_str().to_string();
    let mut redirect_count = 0u32;

    loop {
        log::debug!("Requesting {}", last_url);
        let mut request = client.get(last_url.as_str());

        if let Some(user_agent) = user_agent {
            request = request.header(reqwest::header::USER_AGENT, user_agent);
        }

        request = request.header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.5");

        if let Some(referer) = referer {
            request = request.header(reqwest::header::REFERER, referer);
        }

        let response = request.send().await.context("failed to request url")?;

        let is_redirect_code = [301, 308, 302, 303, 307].contains(&response.status().as_u16());
        let location_header = response.headers().get(reqwest::header::LOCATION);

        match (is_redirect_code, location_header) {
            (true, Some(redirect_url)) => {
                if redirect_count >= MAX_REDIRECTS {
                    anyhow::bail!("more than {} redirects", MAX_REDIRECTS);
                }

                redirect_count += 1;
                let redirect_url = redirect_url
                    .to_str()
                    .context("redirect url could not be converted to string")?;
                last_url = url::Url::parse(&last_url)
                    .and_then(|base| base.join(redirect_url))
                    .context("redirect url is invalid")?
                    .to_string();
                log::trace!("Following redirect to {}", last_url);
            }
            _ => return response.error_for_status().context("server returned an error"),
        }
    }
}

pub(crate) async fn get_page_text<U: IntoUrl>(
    url: U,
    user_agent: Option<&str>,
    referer: Option<&str>,
) -> Result<String, anyhow::Error> {
    get_response(url, user_agent, referer)
        .await?
        .text()
        .await
        .context("failed to parse response body as text")
}
