use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Query parameter carrying the property category in feed URLs
const CATEGORY_PARAM: &str = "bs";

/// Base that relative feed references such as `?bs=010` resolve against
const RELATIVE_BASE: &str = "http://feed.invalid/";

/// Property category of a crawl
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    NewApartment,
    UsedApartment,
    NewHouse,
    UsedHouse,
    Land,
}

impl ListingType {
    pub const ALL: [ListingType; 5] = [
        ListingType::UsedHouse,
        ListingType::NewHouse,
        ListingType::Land,
        ListingType::UsedApartment,
        ListingType::NewApartment,
    ];

    /// Classify a feed URL by its `bs` query parameter.
    ///
    /// Relative references are accepted. Unknown codes, a missing parameter and
    /// unparseable input fall back to `Land`.
    pub fn from_feed_url(raw_url: &str) -> Self {
        let Ok(url) = Url::parse(RELATIVE_BASE).and_then(|base| base.join(raw_url)) else {
            return ListingType::Land;
        };

        url.query_pairs()
            .find(|(key, _)| key == CATEGORY_PARAM)
            .map(|(_, code)| Self::from_category_code(&code))
            .unwrap_or(ListingType::Land)
    }

    fn from_category_code(code: &str) -> Self {
        match code {
            "010" => ListingType::NewApartment,
            "011" => ListingType::UsedApartment,
            "020" => ListingType::NewHouse,
            "021" => ListingType::UsedHouse,
            _ => ListingType::Land,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::NewApartment => "new_apartment",
            ListingType::UsedApartment => "used_apartment",
            ListingType::NewHouse => "new_house",
            ListingType::UsedHouse => "used_house",
            ListingType::Land => "land",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown listing type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "https://suumo.jp/jj/bukken/ichiran/JJ012FC001/?ar=040&kb=1&rssFlg=1";

    #[test]
    fn test_known_codes() {
        let cases = [
            ("010", ListingType::NewApartment),
            ("011", ListingType::UsedApartment),
            ("020", ListingType::NewHouse),
            ("021", ListingType::UsedHouse),
            ("030", ListingType::Land),
        ];
        for (code, expected) in cases {
            let url = format!("{}&bs={}", FEED, code);
            assert_eq!(ListingType::from_feed_url(&url), expected, "bs={}", code);
        }
    }

    #[test]
    fn test_unknown_code_defaults_to_land() {
        let url = format!("{}&bs=999", FEED);
        assert_eq!(ListingType::from_feed_url(&url), ListingType::Land);
    }

    #[test]
    fn test_missing_param_and_garbage() {
        assert_eq!(ListingType::from_feed_url(FEED), ListingType::Land);
        for input in ["", "not a url", "://", "bs=010", "http://[::1"] {
            assert_eq!(ListingType::from_feed_url(input), ListingType::Land);
        }
    }

    #[test]
    fn test_relative_references() {
        assert_eq!(ListingType::from_feed_url("?bs=010"), ListingType::NewApartment);
        assert_eq!(
            ListingType::from_feed_url("/jj/bukken/?ar=040&bs=021"),
            ListingType::UsedHouse
        );
        assert_eq!(ListingType::from_feed_url("/jj/bukken/?ar=040"), ListingType::Land);
    }

    #[test]
    fn test_string_forms_agree() {
        for t in ListingType::ALL {
            assert_eq!(t.as_str().parse::<ListingType>().unwrap(), t);
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        assert!("villa".parse::<ListingType>().is_err());
    }
}
