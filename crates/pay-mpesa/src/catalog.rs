//! # Catalog
//!
//! Public artwork and exhibition listings. No credential needed.

use crate::client::ApiClient;
use pay_core::{Artwork, ArtworkList, Exhibition, ExhibitionList, PaymentResult};
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: ApiClient,
}

impl CatalogClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn artworks(&self) -> PaymentResult<Vec<Artwork>> {
        let url = self.client.config().url("/artworks");
        let list: ArtworkList = self.client.get_json(&url, None, "artworks").await?;
        Ok(list.artworks)
    }

    #[instrument(skip(self))]
    pub async fn artwork(&self, id: &str) -> PaymentResult<Artwork> {
        let url = self.client.config().url(&format!("/artworks/{}", id));
        self.client
            .get_json(&url, None, &format!("artwork {}", id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn exhibitions(&self) -> PaymentResult<Vec<Exhibition>> {
        let url = self.client.config().url("/exhibitions");
        let list: ExhibitionList = self.client.get_json(&url, None, "exhibitions").await?;
        Ok(list.exhibitions)
    }

    #[instrument(skip(self))]
    pub async fn exhibition(&self, id: &str) -> PaymentResult<Exhibition> {
        let url = self.client.config().url(&format!("/exhibitions/{}", id));
        self.client
            .get_json(&url, None, &format!("exhibition {}", id))
            .await
    }
}
