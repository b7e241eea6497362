//! Golden layouts. Atlas files produced from these sequences are compared
//! byte-for-byte downstream, so any change here is a breaking change.

use splitpack::{InputItem, ItemOrder, PagePacker, RectanglePacker};

#[test]
fn glyph_run() {
    let mut packer = RectanglePacker::new((64, 64)).unwrap();
    let sizes = [
        (32, 20),
        (20, 20),
        (12, 20),
        (16, 16),
        (16, 16),
        (48, 10),
        (30, 30),
        (8, 8),
    ];

    let mut layout = String::new();
    for &size in &sizes {
        let placement = packer.add(size).unwrap();
        let line = match placement {
            Some(region) => format!("{}x{} -> {}\n", size.0, size.1, region),
            None => format!("{}x{} -> no room\n", size.0, size.1),
        };
        layout.push_str(&line);
    }

    insta::assert_snapshot!(layout, @r###"
    32x20 -> (0, 0) 32x20
    20x20 -> (32, 0) 20x20
    12x20 -> (52, 0) 12x20
    16x16 -> (0, 20) 16x16
    16x16 -> (0, 36) 16x16
    48x10 -> (16, 20) 48x10
    30x30 -> (16, 30) 30x30
    8x8 -> (0, 52) 8x8
    "###);
}

#[test]
fn padded_pages() {
    let glyphs = vec![
        InputItem::new('A', (14, 18)),
        InputItem::new('B', (13, 18)),
        InputItem::new('g', (11, 22)),
        InputItem::new('i', (4, 19)),
        InputItem::new('m', (20, 13)),
        InputItem::new('W', (22, 18)),
        InputItem::new('.', (4, 4)),
        InputItem::new('Q', (16, 24)),
        InputItem::new('#', (30, 30)),
        InputItem::new('-', (10, 3)),
    ];

    let packer = PagePacker::new()
        .min_size((32, 32))
        .max_size((64, 64))
        .padding(1)
        .order(ItemOrder::HeightDescending);

    let output = packer.pack(glyphs).unwrap();

    let mut layout = String::new();
    for (index, bucket) in output.buckets().iter().enumerate() {
        let (width, height) = bucket.size();
        layout.push_str(&format!("page {} ({}x{})\n", index, width, height));

        for item in bucket.items() {
            layout.push_str(&format!("  {} {}\n", item.key(), item.region()));
        }
    }

    insta::assert_snapshot!(layout, @r###"
    page 0 (64x64)
      # (1, 1) 30x30
      Q (33, 1) 16x24
      g (51, 1) 11x22
      i (1, 33) 4x19
      W (7, 33) 22x18
      A (31, 33) 14x18
      B (47, 33) 13x18
      . (33, 27) 4x4
      - (39, 27) 10x3
    page 1 (32x32)
      m (1, 1) 20x13
    "###);
}
