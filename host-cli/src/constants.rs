pub const DEFAULT_LABEL: &str = "demo wallet";
pub const DEFAULT_XPUB: &str = "xpub6BosfCnifzxcFwrSzQiqu2DBVTshkCXacvNsWGYJVVhhawA7d4R5WSWGFNbi8Aw6ZRc1brxMyWMzG3DSSSSoekkudhUd9yLb6qx39T9nMdj";
pub const DEFAULT_ADDRESS: &str = "1JAd7XCBzGudGpJQSDSfpmJhiygtLQWaGL";
pub const DEVICE_VENDOR: &str = "simulated";
pub const DEVICE_VERSION: (u32, u32, u32) = (1, 6, 0);
