//! Blog post validation.

use serde_json::Value as Json;
use url::Url;

use crate::doc::PostDocument;

use super::{
    as_object, check_slug, optional_str, optional_timestamp, require_str, str_or_empty, Errors,
    ValidationError,
};

#[tracing::instrument(skip_all)]
pub fn validate_post_document(value: &Json) -> Result<PostDocument, ValidationError> {
    let mut errors = Errors::default();
    let Some(obj) = as_object(value, "", &mut errors) else {
        return Err(ValidationError::single("", "expected an object"));
    };

    let id = require_str(obj, "", "id", &mut errors).unwrap_or_default();
    if !id.is_empty() {
        check_slug(&id, "id", &mut errors);
    }
    let title = require_str(obj, "", "title", &mut errors).unwrap_or_default();
    let excerpt = str_or_empty(obj, "", "excerpt", &mut errors);
    let body = require_str(obj, "", "body", &mut errors).unwrap_or_default();
    let category = require_str(obj, "", "category", &mut errors).unwrap_or_default();
    if !category.is_empty() {
        check_slug(&category, "category", &mut errors);
    }

    let tags = match obj.get("tags") {
        None | Some(Json::Null) => Vec::new(),
        Some(Json::Array(items)) => {
            let mut tags = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(tag) if !tag.trim().is_empty() => {
                        let path = format!("tags[{i}]");
                        check_slug(tag, &path, &mut errors);
                        tags.push(tag.to_owned());
                    }
                    _ => errors.push(format!("tags[{i}]"), "must be a non-empty string"),
                }
            }
            tags
        }
        Some(_) => {
            errors.push("tags", "must be an array of strings");
            Vec::new()
        }
    };

    let image_url = optional_str(obj, "", "imageUrl", &mut errors);
    if let Some(raw) = image_url.as_deref() {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push("imageUrl", "must be an http(s) URL"),
        }
    }

    let created_at = optional_timestamp(obj, "", "createdAt", &mut errors);
    let updated_at = optional_timestamp(obj, "", "updatedAt", &mut errors);

    errors.into_result(PostDocument {
        id,
        title,
        excerpt,
        body,
        category,
        tags,
        image_url,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_post_round_trips() {
        let input = json!({
            "id": "choosing-a-vps",
            "title": "Choosing a VPS",
            "excerpt": "What to look for.",
            "body": "## RAM matters\n\nStart with 2 GB.",
            "category": "guides",
            "tags": ["vps", "sizing"],
            "imageUrl": "https://cdn.example.com/cover.png",
        });
        let post = validate_post_document(&input).unwrap();
        assert_eq!(post.tags, vec!["vps", "sizing"]);

        let wire = serde_json::to_value(&post).unwrap();
        assert_eq!(validate_post_document(&wire).unwrap(), post);
    }

    #[test]
    fn rejects_bad_tag_and_category() {
        let input = json!({
            "id": "x", "title": "t", "body": "b",
            "category": "Not A Slug",
            "tags": ["ok", ""],
        });
        let err = validate_post_document(&input).unwrap_err();
        let paths: Vec<_> = err.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["category", "tags[1]"]);
    }

    #[test]
    fn image_url_is_optional_but_checked() {
        let input = json!({"id": "x", "title": "t", "body": "b", "category": "c"});
        assert!(validate_post_document(&input).unwrap().image_url.is_none());

        let input = json!({
            "id": "x", "title": "t", "body": "b", "category": "c",
            "imageUrl": "javascript:alert(1)",
        });
        let err = validate_post_document(&input).unwrap_err();
        assert_eq!(err.errors[0].path, "imageUrl");
    }
}
