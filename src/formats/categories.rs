//! Mixer category tree (`CATEGORIES.DAT15`).

use crate::file::{Format, MetadataFile};
use crate::hash::HashId;
use crate::wire::Array;

crate::record! {
    /// Categories carry no shared header fields.
    pub struct CategoryHeader {}
}

crate::identified_record! {
    pub struct Category = 0, "audCategory" {
        flags:            u32                        => "Flags",
        field09:          i16                        => "__field09",
        field0b:          i16                        => "__field0b",
        field0d:          i16                        => "__field0d",
        field0f:          i16                        => "__field0f",
        field11:          i16                        => "__field11",
        field13:          i16                        => "__field13",
        field15:          i16                        => "__field15",
        field17:          i16                        => "__field17",
        field19:          u16                        => "__field19",
        field1b:          u16                        => "__field1b",
        field1d:          u16                        => "__field1d",
        field1f:          u16                        => "__field1f",
        field21:          u16                        => "__field21",
        child_categories: Array<HashId, u8, true>    => "ChildCategories",
    }
}

crate::variants! {
    pub enum CategoryVariant in "CategoriesMetadataContainer" {
        Category(Category),
    }
}

pub struct Categories;

impl Format for Categories {
    const NAME: &'static str = "categories";
    const VERSION: u32 = 15;

    type Header = CategoryHeader;
    type Payload = CategoryVariant;
}

pub type CategoriesFile = MetadataFile<Categories>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::Entry;
    use crate::hash::HashDictionary;

    fn category(name: &str, children: &[&str]) -> Entry<Categories> {
        Entry::<Categories>::new(
            name,
            CategoryHeader {},
            CategoryVariant::Category(Category {
                child_categories: children.iter().map(|c| HashId::of(c)).collect::<Vec<_>>().into(),
                ..Category::default()
            }),
        )
    }

    #[test]
    fn child_categories_are_hash_references() {
        let file = CategoriesFile::new(vec![category("base", &["music", "sfx"]), category("music", &[])]);
        // 8 + tag + name offset + 30 bytes of fields + count byte
        let first_child = 8 + 1 + 4 + 30 + 1;
        assert_eq!(file.offsets().hash, vec![first_child, first_child + 4]);
        assert!(file.offsets().archive.is_empty());
    }

    #[test]
    fn children_resolve_once_names_are_registered() {
        let file = CategoriesFile::new(vec![category("base", &["music"]), category("music", &[])]);
        let mut dict = HashDictionary::new();
        file.register_names(&mut dict);
        let text = file.to_text(&dict).unwrap();
        assert_eq!(text["base"]["Metadata"]["ChildCategories"][0], "music");
        assert_eq!(text["base"]["Type"], "audCategory");

        let bytes = file.write().unwrap();
        assert_eq!(CategoriesFile::read(&bytes).unwrap(), file);
        assert_eq!(CategoriesFile::from_text(&text).unwrap().write().unwrap(), bytes);
    }
}
