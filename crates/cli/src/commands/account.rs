//! Account commands.
//!
//! Passwords are read from stdin, one per line, so they never show up in the
//! process list or shell history:
//!
//! ```bash
//! printf 'pw\npw\n' | jaelle account register -e ana@example.com -f Ana -l Lopez --agree-terms
//! printf 'pw\n' | jaelle account login -e ana@example.com
//! ```

use jaelle_storefront::forms::{LoginForm, RegistrationForm};
use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::info;

use super::{CommandError, Context};

fn stdin() -> BufReader<Stdin> {
    BufReader::new(tokio::io::stdin())
}

/// Read one line as a secret. End of input yields an empty secret.
async fn read_secret<R>(reader: &mut R, prompt: &str) -> Result<SecretString, CommandError>
where
    R: AsyncBufRead + Unpin,
{
    eprint!("{prompt}: ");

    let mut line = String::new();
    reader.read_line(&mut line).await?;
    let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::from(trimmed))
}

pub async fn register(
    ctx: &Context,
    email: String,
    first_name: String,
    last_name: String,
    agree_terms: bool,
) -> Result<(), CommandError> {
    let mut input = stdin();
    let form = RegistrationForm {
        first_name,
        last_name,
        email,
        password: read_secret(&mut input, "Password").await?,
        confirm_password: read_secret(&mut input, "Confirm password").await?,
        agree_terms,
    };
    let request = form.validate()?;

    match ctx.client.register(&request).await {
        Ok(user) => {
            println!("Account created for {} (id {}).", user.email, user.id);
            Ok(())
        }
        Err(e) => {
            for (field, message) in e.field_errors() {
                println!("  {field}: {message}");
            }
            Err(e.into())
        }
    }
}

/// Log in and print the issued tokens as JSON.
pub async fn login(ctx: &Context, email: String) -> Result<(), CommandError> {
    let form = LoginForm {
        email,
        password: read_secret(&mut stdin(), "Password").await?,
    };
    let credentials = form.validate()?;
    let tokens = ctx.client.obtain_token(&credentials).await?;
    info!(email = %credentials.email, "Logged in");

    let out = serde_json::json!({
        "access": tokens.access.expose_secret(),
        "refresh": tokens.refresh.as_ref().map(ExposeSecret::expose_secret),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Exchange a refresh token (read from stdin) for a new access token.
pub async fn refresh(ctx: &Context) -> Result<(), CommandError> {
    let refresh = read_secret(&mut stdin(), "Refresh token").await?;
    let tokens = ctx.client.refresh_token(&refresh).await?;

    let out = serde_json::json!({
        "access": tokens.access.expose_secret(),
        "refresh": tokens.refresh.as_ref().map(ExposeSecret::expose_secret),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
