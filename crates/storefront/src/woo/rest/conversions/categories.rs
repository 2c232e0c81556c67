//! Category conversion functions.

use wicker_core::CategoryId;

use crate::woo::rest::wire::WireCategory;
use crate::woo::types::Category;

use super::products::convert_image;

/// Convert a wire category. WordPress encodes "no parent" as `0`.
pub fn convert_category(category: WireCategory) -> Category {
    Category {
        id: CategoryId::new(category.id),
        name: category.name,
        slug: category.slug,
        parent: (category.parent != 0).then(|| CategoryId::new(category.parent)),
        description: category.description,
        count: category.count,
        image: category.image.map(convert_image),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_top_level_category() {
        let wire: WireCategory = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Pantry",
            "slug": "pantry",
            "parent": 0,
            "description": "Shelf-stable goods",
            "count": 12,
            "image": null
        }))
        .unwrap();

        let category = convert_category(wire);
        assert_eq!(category.id, CategoryId::new(7));
        assert!(category.parent.is_none());
        assert_eq!(category.count, 12);
    }

    #[test]
    fn test_convert_child_category() {
        let wire: WireCategory = serde_json::from_value(serde_json::json!({
            "id": 9,
            "name": "Jams",
            "slug": "jams",
            "parent": 7,
            "description": "",
            "count": 4,
            "image": {"id": 3, "src": "https://shop.test/jams.jpg", "alt": "Jams"}
        }))
        .unwrap();

        let category = convert_category(wire);
        assert_eq!(category.parent, Some(CategoryId::new(7)));
        assert_eq!(category.image.unwrap().alt.as_deref(), Some("Jams"));
    }
}
