//! Forum URL conventions: SEO slugs, page paths and id extraction

/// Build the vBulletin SEO slug of a title or user name
///
/// ASCII alphanumerics are lowercased and kept; every other run of
/// characters collapses into a single `-`. Leading and trailing dashes
/// are dropped.
pub fn url_name(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Path of a user profile page
pub fn profile_path(user_id: u64, name: &str) -> String {
    format!("forum/members/{}-{}.html", user_id, url_name(name))
}

/// Path of the first page of a thread inside its section
pub fn thread_path(section: &str, thread_id: u64, title: &str) -> String {
    format!("forum/{}/{}-{}.html", section, thread_id, url_name(title))
}

/// Path of a section's thread listing; page 1 is `index.html`
pub fn section_path(section: &str, page: u32) -> String {
    if page <= 1 {
        format!("forum/{}/index.html", section)
    } else {
        format!("forum/{}/index{}.html", section, page)
    }
}

/// Extract a user id from a profile link
pub fn user_id_from_link(href: &str) -> Option<u64> {
    let captures =
        regex!(r"members/(\d+)-[^/]*?\.html|member\.php\?(?:[^#]*&)?u=(\d+)").captures(href)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))?
        .as_str()
        .parse()
        .ok()
}

/// Extract a thread id from a thread link
pub fn thread_id_from_link(href: &str) -> Option<u64> {
    if href.contains("/members/") {
        return None;
    }
    let captures =
        regex!(r"showthread\.php\?(?:[^#]*&)?t=(\d+)|/(\d+)-[^/]*\.html").captures(href)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))?
        .as_str()
        .parse()
        .ok()
}

/// Extract a post id from a post link or anchor
pub fn post_id_from_link(href: &str) -> Option<u64> {
    let captures = regex!(r"[?&]p=(\d+)|#post(\d+)").captures(href)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))?
        .as_str()
        .parse()
        .ok()
}

/// Extract the section slug from a section link such as `/forum/main/`
pub fn section_from_link(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next()?;
    let after_forum = path.split("/forum/").nth(1)?;
    let slug = after_forum.split('/').next()?;
    if slug.is_empty() || slug.contains('.') {
        return None;
    }
    Some(slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_url_name_examples() {
        assert_eq!(url_name("Hello World!"), "hello-world");
        assert_eq!(url_name("  [WTS] Gold -- cheap  "), "wts-gold-cheap");
        assert_eq!(url_name("Mr. Über"), "mr-ber");
        assert_eq!(url_name("***"), "");
    }

    #[test]
    fn test_section_path_first_page() {
        assert_eq!(section_path("main", 1), "forum/main/index.html");
        assert_eq!(section_path("main", 0), "forum/main/index.html");
        assert_eq!(section_path("main", 3), "forum/main/index3.html");
    }

    #[test]
    fn test_profile_path() {
        assert_eq!(profile_path(1234, "Some User"), "forum/members/1234-some-user.html");
    }

    #[test]
    fn test_link_extraction() {
        assert_eq!(
            user_id_from_link("https://www.elitepvpers.com/forum/members/4759-mostey.html"),
            Some(4759)
        );
        assert_eq!(user_id_from_link("member.php?s=&u=42"), Some(42));
        assert_eq!(user_id_from_link("https://www.elitepvpers.com/forum/main/"), None);

        assert_eq!(thread_id_from_link("showthread.php?t=3311"), Some(3311));
        assert_eq!(
            thread_id_from_link("https://www.elitepvpers.com/forum/main/3311-some-title.html"),
            Some(3311)
        );
        assert_eq!(thread_id_from_link("forum/members/7-x.html"), None);

        assert_eq!(post_id_from_link("showthread.php?p=99#post99"), Some(99));
        assert_eq!(post_id_from_link("#post123"), Some(123));

        assert_eq!(
            section_from_link("https://www.elitepvpers.com/forum/main/"),
            Some("main".to_string())
        );
        assert_eq!(section_from_link("https://www.elitepvpers.com/forum/usercp.php"), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_url_name_is_clean(title in "\\PC{0,60}") {
            let slug = url_name(&title);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
            prop_assert!(slug.chars().all(|c| c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit()));
        }

        #[test]
        fn prop_profile_link_roundtrip(id in 1u64..10_000_000u64, name in "[A-Za-z0-9 ]{1,20}") {
            let path = profile_path(id, &name);
            prop_assert_eq!(user_id_from_link(&path), Some(id));
        }
    }
}
