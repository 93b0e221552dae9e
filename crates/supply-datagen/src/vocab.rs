//! Fixed vocabularies the generator draws from

/// Countries and ten cities in each
pub const COUNTRY_CITIES: &[(&str, &[&str])] = &[
    ("USA", &["New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio", "San Diego", "Dallas", "San Jose"]),
    ("China", &["Shanghai", "Beijing", "Shenzhen", "Guangzhou", "Chengdu", "Hangzhou", "Wuhan", "Xi'an", "Tianjin", "Nanjing"]),
    ("India", &["Mumbai", "Delhi", "Bangalore", "Hyderabad", "Ahmedabad", "Chennai", "Kolkata", "Surat", "Pune", "Jaipur"]),
    ("Germany", &["Berlin", "Hamburg", "Munich", "Cologne", "Frankfurt", "Stuttgart", "Düsseldorf", "Dortmund", "Essen", "Leipzig"]),
    ("Japan", &["Tokyo", "Yokohama", "Osaka", "Nagoya", "Sapporo", "Fukuoka", "Kobe", "Kyoto", "Kawasaki", "Saitama"]),
    ("South Korea", &["Seoul", "Busan", "Incheon", "Daegu", "Daejeon", "Gwangju", "Suwon", "Ulsan", "Changwon", "Seongnam"]),
    ("Vietnam", &["Ho Chi Minh City", "Hanoi", "Da Nang", "Haiphong", "Can Tho", "Bien Hoa", "Thu Dau Mot", "Nha Trang", "Vung Tau", "Hue"]),
    ("Taiwan", &["Taipei", "New Taipei", "Taichung", "Kaohsiung", "Taoyuan", "Tainan", "Hsinchu", "Keelung", "Chiayi", "Changhua"]),
    ("Mexico", &["Mexico City", "Ecatepec", "Guadalajara", "Puebla", "Juárez", "Tijuana", "León", "Zapopan", "Monterrey", "Nezahualcóyotl"]),
    ("Brazil", &["São Paulo", "Rio de Janeiro", "Brasília", "Salvador", "Fortaleza", "Belo Horizonte", "Manaus", "Curitiba", "Recife", "Porto Alegre"]),
    ("UK", &["London", "Birmingham", "Glasgow", "Liverpool", "Bristol", "Manchester", "Sheffield", "Leeds", "Edinburgh", "Leicester"]),
    ("France", &["Paris", "Marseille", "Lyon", "Toulouse", "Nice", "Nantes", "Strasbourg", "Montpellier", "Bordeaux", "Lille"]),
    ("Italy", &["Rome", "Milan", "Naples", "Turin", "Palermo", "Genoa", "Bologna", "Florence", "Bari", "Catania"]),
    ("Canada", &["Toronto", "Montreal", "Vancouver", "Calgary", "Edmonton", "Ottawa", "Winnipeg", "Quebec City", "Hamilton", "Kitchener"]),
    ("Australia", &["Sydney", "Melbourne", "Brisbane", "Perth", "Adelaide", "Gold Coast", "Canberra", "Newcastle", "Wollongong", "Hobart"]),
];

pub const INDUSTRIES: &[&str] = &[
    "Semiconductors", "Electronics", "Automotive", "Aerospace", "Pharmaceuticals",
    "Medical Devices", "Food & Beverage", "Chemicals", "Construction", "Textiles",
    "Apparel", "Logistics", "Shipping", "Manufacturing", "Steel & Metals",
    "Plastics", "Rubber", "Wood & Paper", "Mining", "Oil & Gas",
    "Renewable Energy", "Telecom", "Software", "Hardware", "Furniture",
    "Jewelry", "Toys", "Sports Equipment", "Agriculture", "Fishing",
];

pub const COMPANY_TYPES: &[&str] = &[
    "Corp", "Inc", "Ltd", "Co", "Group", "Enterprises", "Industries",
    "Solutions", "Systems", "Technologies", "International", "Global",
    "Manufacturing", "Trading", "Supply", "Distributors", "Ventures",
];

/// Words combined pairwise into supplier names
pub const NAME_WORDS: &[&str] = &[
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta",
    "Omega", "Sigma", "Quantum", "Precision", "Advanced", "Premium", "Elite",
    "Superior", "Excel", "Prime", "First", "National", "United", "Federal",
    "Central", "Pacific", "Atlantic", "Continental", "Worldwide", "Universal",
    "Innovative", "Creative", "Dynamic", "Strategic", "Reliable", "Trusted",
    "Quality", "Standard", "Professional", "Technical", "Digital", "Smart",
    "Eco", "Green", "Sustainable", "Modern", "New", "Next", "Future", "Vision",
    "Star", "Sun", "Moon", "Earth", "Ocean", "Mountain", "River", "Valley",
    "Eagle", "Lion", "Tiger", "Dragon", "Phoenix", "Pegasus", "Orion", "Apollo",
];

/// Material categories and the material types in each
pub const MATERIAL_CATEGORIES: &[(&str, &[&str])] = &[
    ("Electronics", &[
        "Microchip", "Processor", "Circuit Board", "Capacitor", "Resistor",
        "Transistor", "LED", "Sensor", "Memory Chip", "Integrated Circuit",
        "Semiconductor Wafer", "PCB", "Connector", "Oscillator", "Diode",
    ]),
    ("Chemicals", &[
        "Active Pharmaceutical Ingredient", "Chemical Compound", "Polymer",
        "Solvent", "Catalyst", "Reagent", "Additive", "Resin", "Adhesive",
        "Lubricant", "Coating", "Pigment", "Dye", "Surfactant", "Acid",
    ]),
    ("Metals", &[
        "Steel Alloy", "Aluminum Sheet", "Copper Wire", "Titanium Rod",
        "Brass Fitting", "Stainless Steel", "Bronze Casting", "Zinc Plate",
        "Magnesium Ingot", "Tungsten Carbide", "Nickel Coil", "Lead Plate",
    ]),
    ("Plastics", &[
        "Polyethylene Pellet", "PVC Compound", "ABS Plastic", "Polycarbonate Sheet",
        "Nylon Fiber", "Polypropylene Resin", "Acrylic Panel", "PET Preform",
        "Polyurethane Foam", "Silicone Rubber", "TPE Compound", "EPS Bead",
    ]),
    ("Textiles", &[
        "Cotton Fabric", "Polyester Yarn", "Nylon Mesh", "Wool Blend",
        "Silk Thread", "Linen Cloth", "Denim Fabric", "Felt Material",
        "Technical Textile", "Non-woven Fabric", "Kevlar Fiber", "Spandex",
    ]),
    ("Raw Materials", &[
        "Crude Oil", "Natural Gas", "Iron Ore", "Bauxite", "Copper Concentrate",
        "Wood Pulp", "Silica Sand", "Limestone", "Gypsum", "Phosphate Rock",
        "Potash", "Sulfur", "Clay", "Graphite", "Lithium Carbonate",
    ]),
    ("Components", &[
        "Precision Bearing", "Gear Assembly", "Hydraulic Cylinder", "Pump Housing",
        "Valve Body", "Motor Stator", "Compressor Rotor", "Heat Exchanger",
        "Filter Element", "Seal Kit", "Fastener Set", "Spring Assembly",
    ]),
    ("Packaging", &[
        "Corrugated Box", "Plastic Container", "Glass Bottle", "Aluminum Can",
        "Label Stock", "Shrink Wrap", "Protective Foam", "Pallet",
        "Drum Container", "Flexible Pouch", "Clamshell Package", "Crate",
    ]),
];

/// Part-number prefixes
pub const MATERIAL_PREFIXES: &[&str] = &[
    "AX", "BX", "CX", "DX", "EX", "FX", "GX", "HX", "IX", "JX",
    "ALPHA", "BETA", "GAMMA", "DELTA", "OMEGA", "SIGMA", "ZETA",
    "TECH", "PRO", "ULTRA", "MEGA", "HYPER", "SUPER", "MAX",
    "ECO", "BIO", "NANO", "MICRO", "MACRO", "QUANTUM",
];

pub const MATERIAL_SUFFIXES: &[&str] = &[
    "", "-A", "-B", "-C", "-PRO", "-PLUS", "-MAX", "-ULTRA", "-ECO", "-BIO",
];

pub const DESCRIPTIVE_TERMS: &[&str] = &[
    "High-Purity", "Precision", "Industrial-Grade", "Medical-Grade",
    "Food-Grade", "Military-Spec", "High-Temp", "Corrosion-Resistant",
    "UV-Stable", "Flame-Retardant", "Conductive", "Magnetic",
    "Optical", "Structural", "Thermal", "Electrical", "Mechanical",
];

/// Share of material names that use a part number instead of a descriptive term
pub const PART_NUMBER_SHARE: f64 = 0.6;
