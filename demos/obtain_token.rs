//! Obtains an access token from a local mock token endpoint with the default reqwest transport,
//! then calls a checkout endpoint with the token.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use paysign::{
	auth::Credential,
	config::{Endpoints, Environment},
	request::{self, HalResource, RequestHeaders},
	token::TokenClient,
	url::Url,
};

const TOKEN_PATH: &str = "/api/merchantintegration/v1/token/obtain";
const CHECKOUT_PATH: &str = "/api/checkout/v1/checkouts/demo";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).header_exists("x-auth-code");
			then.status(200)
				.header("content-type", "application/hal+json")
				.body("{\"access_token\":\"demo-access\",\"expires_in\":3600}");
		})
		.await;
	let checkout_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(CHECKOUT_PATH).header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/hal+json").body(
				"{\"_links\":{\"self\":{\"href\":\"https://api.sandbox.paydirekt.de/api/checkout/v1/checkouts/demo\"}}}",
			);
		})
		.await;
	// Loopback endpoints may use plain HTTP; everything else must be HTTPS.
	let endpoints = Endpoints::for_environment(Environment::Sandbox)?
		.with_token_obtain(Url::parse(&server.url(TOKEN_PATH))?)?;
	let credential = Credential::new(
		"e81d298b-60dd-4f46-9ec9-1dbc72f5b5df",
		"GJlN718sQxN1unxbLWHVlcf0FgXw2kMyfRwD0mgTRME=",
	)?;
	let client = TokenClient::from_endpoints(&endpoints, credential)?;
	let token = client.obtain_access_token().await?;

	println!("Access token valid for {} seconds.", token.expires_in_seconds);

	let checkout_request = request::get(
		&Url::parse(&server.url(CHECKOUT_PATH))?,
		RequestHeaders::authorized(&token),
	)?;
	let checkout = client.executor().execute::<HalResource>(checkout_request).await?;

	println!("Checkout resource: {:?}.", checkout.self_link());

	token_mock.assert_async().await;
	checkout_mock.assert_async().await;

	Ok(())
}
