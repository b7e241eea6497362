use splitpack::{InputItem, PackError, PagePacker, RectanglePacker, Region};

/// Small deterministic generator so failures are reproducible without pulling
/// in a random number crate.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u32
    }

    fn size(&mut self, max: u32) -> (u32, u32) {
        (1 + self.next() % max, 1 + self.next() % max)
    }
}

fn assert_disjoint(regions: &[Region]) {
    for (i, a) in regions.iter().enumerate() {
        for b in &regions[i + 1..] {
            assert!(!a.intersects(b), "{} overlaps {}", a, b);
        }
    }
}

#[test]
fn placements_never_overlap_or_leave_atlas() {
    for seed in 0..20 {
        let mut rng = Lcg(seed);
        let atlas = Region::new(0, 0, 256, 192);
        let mut packer = RectanglePacker::new(atlas.size()).unwrap();
        let mut placed = Vec::new();

        for _ in 0..300 {
            let size = rng.size(48);

            if let Some(region) = packer.add(size).unwrap() {
                assert_eq!(region.size(), size);
                assert!(atlas.contains(&region), "{} is outside the atlas", region);
                placed.push(region);
            }
        }

        assert!(!placed.is_empty());
        assert_disjoint(&placed);

        let area: u64 = placed.iter().map(Region::area).sum();
        assert_eq!(packer.used_area(), area);
        assert_eq!(packer.placements().len(), placed.len());
    }
}

#[test]
fn full_atlas_reports_no_room() {
    let mut packer = RectanglePacker::new((120, 80)).unwrap();

    // 6 x 4 tiles of 20x20 cover the atlas exactly.
    for _ in 0..24 {
        assert!(packer.add((20, 20)).unwrap().is_some());
    }

    assert_eq!(packer.add((20, 20)), Ok(None));
    assert_eq!(packer.add((1, 1)), Ok(None));
    assert_eq!(packer.used_area(), 120 * 80);
    assert_disjoint(&packer.placements());
}

#[test]
fn replaying_reproduces_layout() {
    let sizes: Vec<_> = {
        let mut rng = Lcg(7);
        (0..100).map(|_| rng.size(40)).collect()
    };

    let run = || {
        let mut packer = RectanglePacker::new((200, 200)).unwrap();
        sizes
            .iter()
            .map(|&size| packer.add(size).unwrap())
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn oversize_is_distinct_from_no_room() {
    let mut packer = RectanglePacker::new((100, 100)).unwrap();
    packer.add((100, 100)).unwrap();

    assert_eq!(packer.add((100, 100)), Ok(None));
    assert!(matches!(
        packer.add((100, 101)),
        Err(PackError::Oversize { .. })
    ));
}

#[test]
fn pages_never_overlap() {
    let mut rng = Lcg(42);
    let items: Vec<_> = (0..500)
        .map(|index| InputItem::new(index, rng.size(60)))
        .collect();

    let output = PagePacker::new()
        .min_size((64, 64))
        .max_size((256, 256))
        .padding(2)
        .pack(items)
        .unwrap();

    let mut total = 0;
    for bucket in output.buckets() {
        let (width, height) = bucket.size();
        let page = Region::new(0, 0, width, height);

        // Padding belongs to the item, so inflate regions back out before
        // checking for overlap.
        let padded: Vec<_> = bucket
            .items()
            .iter()
            .map(|item| {
                let region = item.region();
                Region::new(region.x - 2, region.y - 2, region.width + 4, region.height + 4)
            })
            .collect();

        for region in &padded {
            assert!(page.contains(region));
        }
        assert_disjoint(&padded);

        total += bucket.items().len();
    }

    assert_eq!(total, 500);
}
