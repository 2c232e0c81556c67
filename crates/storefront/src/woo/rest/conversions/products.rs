//! Product and variation conversion functions.

use wicker_core::{CategoryId, CurrencyCode, ProductId, VariationId};

use crate::woo::WooError;
use crate::woo::rest::wire::{WireImage, WireProduct, WireVariation};
use crate::woo::types::{
    Attribute, CategoryRef, Image, Product, SelectedAttribute, Variation,
};

use super::{parse_price, parse_stock_status};

/// Convert a wire image. Empty alt text becomes `None`.
pub fn convert_image(image: WireImage) -> Image {
    Image {
        id: image.id,
        src: image.src,
        alt: if image.alt.is_empty() {
            None
        } else {
            Some(image.alt)
        },
    }
}

/// Convert a wire product into the storefront shape.
///
/// # Errors
///
/// Returns an error if a non-empty price field fails to parse.
pub fn convert_product(product: WireProduct, currency: CurrencyCode) -> Result<Product, WooError> {
    // average_rating is "0.00" when unrated; surface that as no rating
    let average_rating = match product.average_rating.parse::<f64>() {
        Ok(value) if value > 0.0 => Some(value),
        _ => None,
    };

    Ok(Product {
        id: ProductId::new(product.id),
        name: product.name,
        slug: product.slug,
        permalink: product.permalink,
        description: product.description,
        short_description: product.short_description,
        sku: product.sku,
        price: parse_price(&product.price, currency)?,
        regular_price: parse_price(&product.regular_price, currency)?,
        sale_price: parse_price(&product.sale_price, currency)?,
        on_sale: product.on_sale,
        purchasable: product.purchasable,
        featured: product.featured,
        stock_status: parse_stock_status(&product.stock_status),
        stock_quantity: product.stock_quantity,
        manages_stock: product.manage_stock,
        categories: product
            .categories
            .into_iter()
            .map(|c| CategoryRef {
                id: CategoryId::new(c.id),
                name: c.name,
                slug: c.slug,
            })
            .collect(),
        images: product.images.into_iter().map(convert_image).collect(),
        attributes: product
            .attributes
            .into_iter()
            .map(|a| Attribute {
                id: a.id,
                name: a.name,
                options: a.options,
                variation: a.variation,
            })
            .collect(),
        variations: product.variations.into_iter().map(VariationId::new).collect(),
        related_ids: product.related_ids.into_iter().map(ProductId::new).collect(),
        average_rating,
        rating_count: product.rating_count,
    })
}

/// Convert a wire variation.
///
/// # Errors
///
/// Returns an error if a non-empty price field fails to parse.
pub fn convert_variation(
    variation: WireVariation,
    currency: CurrencyCode,
) -> Result<Variation, WooError> {
    Ok(Variation {
        id: VariationId::new(variation.id),
        sku: variation.sku,
        price: parse_price(&variation.price, currency)?,
        regular_price: parse_price(&variation.regular_price, currency)?,
        sale_price: parse_price(&variation.sale_price, currency)?,
        on_sale: variation.on_sale,
        purchasable: variation.purchasable,
        stock_status: parse_stock_status(&variation.stock_status),
        stock_quantity: variation.stock_quantity,
        attributes: variation
            .attributes
            .into_iter()
            .map(|a| SelectedAttribute {
                name: a.name,
                option: a.option,
            })
            .collect(),
        image: variation.image.map(convert_image),
    })
}
