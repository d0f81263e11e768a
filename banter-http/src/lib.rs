use async_trait::async_trait;
use banter_client::{
    api::{
        self, Author, AuthToken, CommentAck, CommentAction, CommentListResponse, CommentRecord,
        NewSession, PostId, PostView, ReactionCounts, ReactionKind,
    },
    Backend, Error,
};

/// `Backend` implementation over the real HTTP API.
///
/// One value is one connection: `auth` stores the bearer token used by every
/// later call. No retries and no timeouts are configured here; failures come
/// back as `Error::Network` and the caller decides what to do.
pub struct HttpBackend {
    client: reqwest::Client,
    host: String,
    token: Option<AuthToken>,
}

impl HttpBackend {
    pub fn new(host: impl Into<String>) -> HttpBackend {
        HttpBackend {
            client: reqwest::Client::new(),
            host: host.into(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.token
    }

    pub async fn auth(&mut self, session: NewSession) -> Result<AuthToken, Error> {
        session.validate()?;
        let resp = self
            .client
            .post(format!("{}/api/auth", self.host))
            .json(&session)
            .send()
            .await
            .map_err(Error::network)?;
        let tok: AuthToken = check(resp).await?.json().await.map_err(Error::network)?;
        self.token = Some(tok);
        Ok(tok)
    }

    pub async fn unauth(&mut self) -> Result<(), Error> {
        if let Some(tok) = self.token.take() {
            let resp = self
                .client
                .post(format!("{}/api/unauth", self.host))
                .bearer_auth(tok.0)
                .send()
                .await
                .map_err(Error::network)?;
            check(resp).await?;
        }
        Ok(())
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_token(self.client.get(format!("{}/api/{}", self.host, path)))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_token(self.client.post(format!("{}/api/{}", self.host, path)))
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_token(self.client.put(format!("{}/api/{}", self.host, path)))
    }

    fn with_token(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(tok) => req.bearer_auth(tok.0),
            None => req,
        }
    }
}

async fn fetch<R>(req: reqwest::RequestBuilder) -> Result<R, Error>
where
    R: for<'de> serde::Deserialize<'de>,
{
    let resp = req.send().await.map_err(Error::network)?;
    check(resp).await?.json().await.map_err(Error::network)
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.bytes().await.map_err(Error::network)?;
    match api::Error::parse(&body) {
        Ok(err) => Err(Error::Api(err)),
        Err(parse_err) => {
            tracing::warn!(%status, "unparseable error body from server: {parse_err:#}");
            Err(Error::Api(api::Error::Unknown(format!(
                "server answered with status {status}"
            ))))
        }
    }
}

#[derive(serde::Serialize)]
struct SetReaction {
    reaction: Option<ReactionKind>,
}

#[async_trait]
impl Backend for HttpBackend {
    async fn whoami(&mut self) -> Result<Author, Error> {
        fetch(self.get("whoami")).await
    }

    async fn fetch_post(&mut self, post: PostId) -> Result<PostView, Error> {
        fetch(self.get(&format!("post/{}", post.0))).await
    }

    async fn fetch_comments(&mut self, post: PostId) -> Result<Vec<CommentRecord>, Error> {
        let resp: CommentListResponse = fetch(self.get(&format!("post/{}/comments", post.0))).await?;
        if !resp.success {
            return Err(Error::Api(api::Error::Unknown(String::from(
                "comment list endpoint answered success=false",
            ))));
        }
        Ok(resp.comments)
    }

    async fn submit_comment(&mut self, action: CommentAction) -> Result<CommentAck, Error> {
        action.validate()?;
        fetch(self.post("comment").json(&action)).await
    }

    async fn set_reaction(
        &mut self,
        post: PostId,
        reaction: Option<ReactionKind>,
    ) -> Result<ReactionCounts, Error> {
        fetch(
            self.put(&format!("post/{}/reaction", post.0))
                .json(&SetReaction { reaction }),
        )
        .await
    }
}
