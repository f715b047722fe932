use crate::models::quote::{Currency, Market, SymbolMatch};

/// How many matches a search returns at most.
const SEARCH_LIMIT: usize = 5;

/// Major KOSPI/KOSDAQ listings: (code, Korean name, English alias).
///
/// The app resolves Korean symbols locally rather than through a remote
/// search endpoint, so a compact index of the most-traded names covers
/// the journal use case.
const LISTINGS: &[(&str, &str, &str)] = &[
    ("005930", "삼성전자", "Samsung Electronics"),
    ("000660", "SK하이닉스", "SK Hynix"),
    ("373220", "LG에너지솔루션", "LG Energy Solution"),
    ("207940", "삼성바이오로직스", "Samsung Biologics"),
    ("005380", "현대차", "Hyundai Motor"),
    ("005490", "POSCO홀딩스", "POSCO Holdings"),
    ("035420", "NAVER", "Naver"),
    ("000270", "기아", "Kia"),
    ("068270", "셀트리온", "Celltrion"),
    ("035720", "카카오", "Kakao"),
    ("051910", "LG화학", "LG Chem"),
    ("006400", "삼성SDI", "Samsung SDI"),
    ("028260", "삼성물산", "Samsung C&T"),
    ("105560", "KB금융", "KB Financial Group"),
    ("055550", "신한지주", "Shinhan Financial Group"),
    ("012330", "현대모비스", "Hyundai Mobis"),
    ("032830", "삼성생명", "Samsung Life Insurance"),
    ("015760", "한국전력", "KEPCO"),
    ("017670", "SK텔레콤", "SK Telecom"),
    ("030200", "KT", "KT"),
    ("066570", "LG전자", "LG Electronics"),
    ("096770", "SK이노베이션", "SK Innovation"),
    ("003550", "LG", "LG Corp"),
    ("034730", "SK", "SK Inc"),
    ("009150", "삼성전기", "Samsung Electro-Mechanics"),
    ("247540", "에코프로비엠", "EcoPro BM"),
    ("086520", "에코프로", "EcoPro"),
    ("091990", "셀트리온헬스케어", "Celltrion Healthcare"),
    ("022100", "포스코DX", "POSCO DX"),
    ("035760", "CJ ENM", "CJ ENM"),
];

/// Local search index over Korean listings.
#[derive(Debug, Clone)]
pub struct KrxSymbolIndex {
    listings: &'static [(&'static str, &'static str, &'static str)],
}

impl KrxSymbolIndex {
    /// Index over the bundled listing dataset.
    pub fn bundled() -> Self {
        Self { listings: LISTINGS }
    }

    /// Case-insensitive substring match on code, Korean name, or English
    /// alias; first [`SEARCH_LIMIT`] hits in listing order.
    pub fn search(&self, query: &str) -> Vec<SymbolMatch> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }

        self.listings
            .iter()
            .filter(|(code, name, alias)| {
                code.contains(&q)
                    || name.to_lowercase().contains(&q)
                    || alias.to_lowercase().contains(&q)
            })
            .take(SEARCH_LIMIT)
            .map(|(code, name, _)| SymbolMatch {
                symbol: (*code).to_string(),
                name: (*name).to_string(),
                currency: Currency::Krw,
                market: Market::Korea,
            })
            .collect()
    }

    /// Look up the display name for an exact code.
    pub fn name_of(&self, code: &str) -> Option<&'static str> {
        self.listings
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, name, _)| *name)
    }
}

impl Default for KrxSymbolIndex {
    fn default() -> Self {
        Self::bundled()
    }
}
