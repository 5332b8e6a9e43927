use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::{Client, Response, StatusCode};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "quill", about = "command-line client for a quill server")]
struct Cli {
    /// Server base URL.
    #[clap(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Where the session cookie is kept between invocations.
    #[clap(long, default_value = ".quill-session")]
    session: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    Signup {
        #[clap(long)]
        username: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    Login {
        #[clap(long)]
        username: String,
        #[clap(long)]
        password: String,
    },
    Logout,
    /// The public index feed.
    Index {
        #[clap(long)]
        page: Option<u32>,
    },
    Group {
        slug: String,
        #[clap(long)]
        page: Option<u32>,
    },
    Profile {
        username: String,
        #[clap(long)]
        page: Option<u32>,
    },
    /// Posts by authors you follow.
    Following {
        #[clap(long)]
        page: Option<u32>,
    },
    Show {
        username: String,
        post_id: Uuid,
    },
    New {
        #[clap(long)]
        text: String,
        #[clap(long)]
        group: Option<Uuid>,
        #[clap(long)]
        image: Option<PathBuf>,
    },
    Edit {
        username: String,
        post_id: Uuid,
        #[clap(long)]
        text: String,
        #[clap(long)]
        group: Option<Uuid>,
        #[clap(long)]
        image: Option<PathBuf>,
    },
    Comment {
        username: String,
        post_id: Uuid,
        #[clap(long)]
        text: String,
    },
    Follow {
        username: String,
    },
    Unfollow {
        username: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    // redirects are part of the contract; capture them instead of
    // following
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let session = Session {
        client,
        base: args.server.trim_end_matches('/').to_string(),
        path: args.session,
    };

    match args.command {
        Command::Signup {
            username,
            email,
            password,
        } => {
            let resp = session
                .post_form(
                    "/auth/signup/",
                    &[
                        ("username", username.as_str()),
                        ("email", email.as_str()),
                        ("password", password.as_str()),
                    ],
                )
                .await?;
            session.finish_auth(resp, "signed up").await
        }
        Command::Login { username, password } => {
            let resp = session
                .post_form(
                    "/auth/login/",
                    &[
                        ("username", username.as_str()),
                        ("password", password.as_str()),
                    ],
                )
                .await?;
            session.finish_auth(resp, "logged in").await
        }
        Command::Logout => {
            session.post_form("/auth/logout/", &[]).await?;
            session.forget()?;
            println!("logged out");
            Ok(())
        }
        Command::Index { page } => session.show_page("/", page).await,
        Command::Group { slug, page } => session.show_page(&format!("/group/{slug}/"), page).await,
        Command::Profile { username, page } => {
            session.show_page(&format!("/{username}/"), page).await
        }
        Command::Following { page } => session.show_page("/follow/", page).await,
        Command::Show { username, post_id } => {
            session.show_page(&format!("/{username}/{post_id}/"), None).await
        }
        Command::New { text, group, image } => {
            let resp = session.post_post_form("/new/", text, group, image).await?;
            session.report(resp).await
        }
        Command::Edit {
            username,
            post_id,
            text,
            group,
            image,
        } => {
            let resp = session
                .post_post_form(&format!("/{username}/{post_id}/edit/"), text, group, image)
                .await?;
            session.report(resp).await
        }
        Command::Comment {
            username,
            post_id,
            text,
        } => {
            let resp = session
                .post_form(
                    &format!("/{username}/{post_id}/comment"),
                    &[("text", text.as_str())],
                )
                .await?;
            session.report(resp).await
        }
        Command::Follow { username } => {
            let resp = session
                .post_form(&format!("/{username}/follow/"), &[])
                .await?;
            session.report(resp).await
        }
        Command::Unfollow { username } => {
            let resp = session
                .post_form(&format!("/{username}/unfollow/"), &[])
                .await?;
            session.report(resp).await
        }
    }
}

struct Session {
    client: Client,
    base: String,
    path: PathBuf,
}

impl Session {
    fn cookie(&self) -> Option<String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn remember(&self, cookie: &str) -> anyhow::Result<()> {
        std::fs::write(&self.path, cookie)
            .with_context(|| format!("writing session file {}", self.path.display()))
    }

    fn forget(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    async fn get(&self, route: &str) -> anyhow::Result<Response> {
        let mut req = self.client.get(format!("{}{}", self.base, route));
        if let Some(cookie) = self.cookie() {
            req = req.header(COOKIE, cookie);
        }
        Ok(req.send().await?)
    }

    async fn post_form(&self, route: &str, fields: &[(&str, &str)]) -> anyhow::Result<Response> {
        let mut req = self.client.post(format!("{}{}", self.base, route));
        if let Some(cookie) = self.cookie() {
            req = req.header(COOKIE, cookie);
        }
        Ok(req.form(fields).send().await?)
    }

    async fn post_post_form(
        &self,
        route: &str,
        text: String,
        group: Option<Uuid>,
        image: Option<PathBuf>,
    ) -> anyhow::Result<Response> {
        let mut form = reqwest::multipart::Form::new().text("text", text);
        if let Some(group) = group {
            form = form.text("group", group.to_string());
        }
        if let Some(path) = image {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".into());
            let bytes = std::fs::read(&path)
                .with_context(|| format!("reading image {}", path.display()))?;
            form = form.part(
                "image",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );
        }

        let mut req = self.client.post(format!("{}{}", self.base, route));
        if let Some(cookie) = self.cookie() {
            req = req.header(COOKIE, cookie);
        }
        Ok(req.multipart(form).send().await?)
    }

    /// Stores the session cookie a successful signup/login sets.
    async fn finish_auth(&self, resp: Response, verb: &str) -> anyhow::Result<()> {
        if resp.status() == StatusCode::FOUND {
            let cookie = resp
                .headers()
                .get(SET_COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(';').next())
                .context("server set no session cookie")?;
            self.remember(cookie)?;
            println!("{verb}");
            Ok(())
        } else {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body["errors"])?);
            bail!("request rejected");
        }
    }

    async fn show_page(&self, route: &str, page: Option<u32>) -> anyhow::Result<()> {
        let route = match page {
            Some(n) => format!("{route}?page={n}"),
            None => route.to_string(),
        };
        let resp = self.get(&route).await?;
        self.report(resp).await
    }

    /// Prints where a redirect landed, or the page context / error
    /// body.
    async fn report(&self, resp: Response) -> anyhow::Result<()> {
        let status = resp.status();
        if status.is_redirection() {
            let location = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("/");
            println!("-> {location}");
            return Ok(());
        }

        let body: serde_json::Value = resp.json().await?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        if !status.is_success() {
            bail!("server answered {status}");
        }
        Ok(())
    }
}
