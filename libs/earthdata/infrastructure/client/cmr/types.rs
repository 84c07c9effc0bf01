use serde::{Deserialize, Serialize};

/// Body of a `granules.json` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GranuleFeedResponse {
    pub feed: Feed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub entry: Vec<GranuleEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GranuleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_granule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_concept_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granule_size: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_deserializes_sparse_entries() {
        let json = r#"{
            "feed": {
                "updated": "2022-09-01T00:00:00.000Z",
                "entry": [
                    {
                        "id": "G123-LPDAAC_ECS",
                        "time_start": "2021-10-17T00:00:00.000Z",
                        "links": [
                            {"rel": "http://esipfed.org/ns/fedsearch/1.1/data#", "type": "application/x-hdf5", "href": "https://e4ftl01.cr.usgs.gov/a.h5"},
                            {"href": "https://e4ftl01.cr.usgs.gov/a.h5.xml", "inherited": true}
                        ]
                    },
                    {"id": "G124-LPDAAC_ECS"}
                ]
            }
        }"#;

        let parsed: GranuleFeedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.feed.entry.len(), 2);
        assert_eq!(parsed.feed.entry[0].links.len(), 2);
        assert_eq!(
            parsed.feed.entry[0].links[0].mime_type.as_deref(),
            Some("application/x-hdf5")
        );
        assert!(parsed.feed.entry[1].links.is_empty());
    }
}
