// src/cities.rs
//! City list and list-page URL templates.
//!
//! The site paginates cities inconsistently: a couple of cities only serve
//! paged results through the filtered search path, the rest through `/list/`.

use serde::Deserialize;

use crate::config::consts::HOST;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlScheme {
    /// `/{slug}/a0_0msdgscncgpi1ltocsp{page}exx0/`
    Filtered,
    /// `/{slug}/list/` and `/{slug}/list/p{page}/`
    List,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct City {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_scheme")]
    pub scheme: UrlScheme,
}

fn default_scheme() -> UrlScheme {
    UrlScheme::List
}

impl City {
    pub fn new(name: &str, slug: &str, scheme: UrlScheme) -> Self {
        Self { name: s!(name), slug: s!(slug), scheme }
    }

    /// List-page URL for a 1-based page number.
    pub fn page_url(&self, page: u32) -> String {
        match self.scheme {
            UrlScheme::Filtered => format!(
                "{HOST}/{}/a0_0msdgscncgpi1ltocsp{page}exx0/?pvareaid=102179",
                self.slug
            ),
            UrlScheme::List if page <= 1 => format!("{HOST}/{}/list/#pvareaid=100943", self.slug),
            UrlScheme::List => format!("{HOST}/{}/list/p{page}/#pvareaid=100943", self.slug),
        }
    }
}

/// Henan prefecture-level cities.
pub fn henan() -> Vec<City> {
    use UrlScheme::*;
    [
        ("郑州", "zhengzhou", Filtered),
        ("开封", "kaifeng", List),
        ("洛阳", "luoyang", List),
        ("平顶山", "pingdingshan", List),
        ("安阳", "anyang", List),
        ("鹤壁", "hebi", List),
        ("新乡", "xinxiang", Filtered),
        ("焦作", "jiaozuo", List),
        ("濮阳", "puyang", List),
        ("许昌", "xuchang", List),
        ("漯河", "luohe", List),
        ("三门峡", "sanmenxia", List),
        ("南阳", "nanyang", List),
        ("商丘", "shangqiu", List),
        ("信阳", "xinyang", List),
        ("周口", "zhoukou", List),
        ("驻马店", "zhumadian", List),
        ("济源", "jiyuan", List),
    ]
    .into_iter()
    .map(|(name, slug, scheme)| City::new(name, slug, scheme))
    .collect()
}

/// Narrow the list to the given names or slugs, keeping list order.
pub fn select(cities: Vec<City>, wanted: &[String]) -> Vec<City> {
    if wanted.is_empty() {
        return cities;
    }
    cities
        .into_iter()
        .filter(|c| wanted.iter().any(|w| w == &c.name || w.eq_ignore_ascii_case(&c.slug)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtered_scheme_embeds_page() {
        let c = City::new("郑州", "zhengzhou", UrlScheme::Filtered);
        assert_eq!(
            c.page_url(3),
            "https://www.che168.com/zhengzhou/a0_0msdgscncgpi1ltocsp3exx0/?pvareaid=102179"
        );
    }

    #[test]
    fn list_scheme_first_page_has_no_page_segment() {
        let c = City::new("洛阳", "luoyang", UrlScheme::List);
        assert_eq!(c.page_url(1), "https://www.che168.com/luoyang/list/#pvareaid=100943");
        assert_eq!(c.page_url(2), "https://www.che168.com/luoyang/list/p2/#pvareaid=100943");
    }

    #[test]
    fn henan_has_two_filtered_cities() {
        let all = henan();
        assert_eq!(all.len(), 18);
        let filtered: Vec<_> = all.iter().filter(|c| c.scheme == UrlScheme::Filtered).map(|c| c.slug.as_str()).collect();
        assert_eq!(filtered, vec!["zhengzhou", "xinxiang"]);
    }

    #[test]
    fn select_matches_name_or_slug() {
        let picked = select(henan(), &[s!("洛阳"), s!("KaiFeng")]);
        let names: Vec<_> = picked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["开封", "洛阳"]);
        assert_eq!(select(henan(), &[]).len(), 18);
    }
}
