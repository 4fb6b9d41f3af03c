//! Tests for the page content model
//!
//! Covers the block wire format, the structural sequence operations and the
//! panel grid geometry together, the way a page is actually edited.

#[cfg(test)]
mod core_tests {
    use serde_json::json;

    use crate::core::block::{
        AudioBlock, Block, BlockKind, ButtonAction, ButtonBlock, GalleryBlock, ImageBlock,
        TextBlock, VideoBlock,
    };
    use crate::core::layout::{Panel, PanelLayout, Placement};
    use crate::core::page::{Direction, PageSequence, SequenceError};

    fn mixed_page() -> Vec<Block> {
        let mut grid = PanelLayout::default();
        grid.layout.push(Placement::new("p1", 0, 0, 4, 6));
        grid.panels.insert(
            "p1".into(),
            Panel {
                blocks: vec![Block::Text(TextBlock {
                    content: "inside".into(),
                })],
            },
        );

        vec![
            Block::Text(TextBlock {
                content: "<h1>Hello</h1>".into(),
            }),
            Block::Image(ImageBlock {
                url: "/a.png".into(),
                width: Some(500),
            }),
            Block::Video(VideoBlock {
                url: "/v.mp4".into(),
                width: None,
            }),
            Block::Audio(AudioBlock {
                url: "/s.mp3".into(),
            }),
            Block::Gallery(GalleryBlock {
                images: vec!["/1.png".into(), "".into()],
            }),
            Block::Button(ButtonBlock {
                label: "Book".into(),
                action: ButtonAction::Url,
                url: "https://example.com".into(),
                new_tab: true,
                subject: "latent".into(),
                message: String::new(),
            }),
            Block::PanelLayout(grid),
        ]
    }

    /// Adding each kind appends a block with the documented defaults.
    #[test]
    fn test_add_block_uses_documented_defaults() {
        let mut seq = PageSequence::default();
        for kind in BlockKind::ALL {
            let index = seq.add_block(kind).unwrap();
            assert_eq!(index, seq.len() - 1);
            assert_eq!(seq.get(index).and_then(Block::kind), Some(kind));
        }

        let values: Vec<serde_json::Value> = seq
            .blocks()
            .iter()
            .map(|b| serde_json::to_value(b).unwrap())
            .collect();
        assert_eq!(values[0], json!({ "type": "text", "content": "New text block" }));
        assert_eq!(values[1], json!({ "type": "image", "url": "", "width": 400 }));
        assert_eq!(values[2], json!({ "type": "video", "url": "", "width": 640 }));
        assert_eq!(values[3], json!({ "type": "audio", "url": "" }));
        assert_eq!(values[4], json!({ "type": "gallery", "images": [""] }));
        assert_eq!(
            values[5],
            json!({
                "type": "button",
                "label": "Contact me",
                "action": "contact",
                "subject": "",
                "message": ""
            })
        );
        assert_eq!(
            values[6],
            json!({
                "type": "panelLayout",
                "cols": 12,
                "rowHeight": 30,
                "margin": [10, 10],
                "layout": [],
                "panels": {}
            })
        );
    }

    #[test]
    fn test_delete_keeps_relative_order() {
        let original = mixed_page();
        for i in 0..original.len() {
            let mut seq = PageSequence::new(original.clone());
            let removed = seq.delete_block(i).unwrap();
            assert_eq!(removed, original[i]);

            let mut expected = original.clone();
            expected.remove(i);
            assert_eq!(seq.blocks(), expected.as_slice());
        }
    }

    #[test]
    fn test_move_down_then_up_restores() {
        let original = PageSequence::new(mixed_page());
        for i in 0..original.len() - 1 {
            let mut seq = original.clone();
            assert!(seq.move_block(i, Direction::Down));
            assert!(seq.move_block(i + 1, Direction::Up));
            assert_eq!(seq, original);
        }
    }

    #[test]
    fn test_reorder_identity_is_noop() {
        let original = PageSequence::new(mixed_page());
        for i in 0..original.len() {
            let mut seq = original.clone();
            seq.reorder(i, i).unwrap();
            assert_eq!(seq, original);
        }
    }

    #[test]
    fn test_second_grid_rejected_on_loaded_page() {
        let mut seq = PageSequence::new(mixed_page());
        let before = seq.clone();
        assert_eq!(
            seq.add_block(BlockKind::PanelLayout),
            Err(SequenceError::PanelLayoutExists)
        );
        assert_eq!(seq, before);
        assert_eq!(
            SequenceError::PanelLayoutExists.to_string(),
            "A Panel Grid already exists on this page."
        );
    }

    #[test]
    fn test_mixed_sequence_survives_serialization() {
        let blocks = mixed_page();
        let content = Block::serialize_sequence(&blocks).unwrap();
        assert_eq!(Block::parse_sequence(&content).unwrap(), blocks);
    }

    #[test]
    fn test_unknown_blocks_keep_their_position() {
        let content = r#"[
            {"type":"text","content":"a"},
            {"type":"carousel","slides":[1,2,3]},
            {"type":"image","url":"/x.png","width":"wide"},
            {"type":"audio","url":"/s.mp3"}
        ]"#;
        let blocks = Block::parse_sequence(content).unwrap();
        assert_eq!(blocks.len(), 4);
        assert!(blocks[1].is_unknown());
        assert_eq!(blocks[1].type_name(), Some("carousel"));
        assert!(blocks[2].is_unknown());
        assert_eq!(blocks[2].type_name(), Some("image"));

        let written: serde_json::Value =
            serde_json::from_str(&Block::serialize_sequence(&blocks).unwrap()).unwrap();
        assert_eq!(written[1], json!({"type":"carousel","slides":[1,2,3]}));
        assert_eq!(written[2], json!({"type":"image","url":"/x.png","width":"wide"}));
    }

    #[test]
    fn test_reference_grid_example() {
        let mut grid = PanelLayout::default();
        grid.layout.push(Placement::new("a", 0, 0, 4, 6));
        let geometry = grid.geometry(970.0);
        let rect = geometry.rect(&grid.layout[0]);

        assert!((geometry.col_width - 71.6667).abs() < 0.001);
        assert!((rect.width - 316.6667).abs() < 0.001);
        assert_eq!(rect.height, 230.0);
        assert_eq!(rect.left, 0.0);
        assert_eq!(rect.top, 0.0);
    }
}
