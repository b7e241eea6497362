use splitpack::{InputItem, PagePacker};

fn main() {
    env_logger::init();

    let inputs: Vec<_> = (0..5).map(|index| InputItem::new(index, (128, 128))).collect();

    let packer = PagePacker::new().max_size((256, 256));
    let result = packer.pack(inputs).expect("uniform items always fit");

    println!("Pack result: {:#?}", result);
}
