//! In-memory class-file assembly for tests.

pub struct MethodSpec {
    flags: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    exceptions: Option<Vec<String>>,
}

impl MethodSpec {
    pub fn new(flags: u16, name: &str, descriptor: &str) -> Self {
        Self {
            flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            exceptions: None,
        }
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn throws(mut self, exceptions: &[&str]) -> Self {
        self.exceptions = Some(exceptions.iter().map(|e| e.to_string()).collect());
        self
    }
}

pub struct ClassBuilder {
    pool: Vec<u8>,
    pool_count: u16,
    this_class: u16,
    methods: Vec<u8>,
    method_count: u16,
}

impl ClassBuilder {
    pub fn new(internal_name: &str) -> Self {
        let mut builder = Self {
            pool: Vec::new(),
            pool_count: 1,
            this_class: 0,
            methods: Vec::new(),
            method_count: 0,
        };
        builder.this_class = builder.class(internal_name);
        builder
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        self.pool.push(1);
        self.pool.extend_from_slice(&(s.len() as u16).to_be_bytes());
        self.pool.extend_from_slice(s.as_bytes());
        self.next_slot(1)
    }

    pub fn class(&mut self, internal_name: &str) -> u16 {
        let name = self.utf8(internal_name);
        self.pool.push(7);
        self.pool.extend_from_slice(&name.to_be_bytes());
        self.next_slot(1)
    }

    pub fn long_constant(&mut self, value: i64) -> u16 {
        self.pool.push(5);
        self.pool.extend_from_slice(&value.to_be_bytes());
        self.next_slot(2)
    }

    pub fn method(&mut self, spec: MethodSpec) -> &mut Self {
        let name = self.utf8(&spec.name);
        let descriptor = self.utf8(&spec.descriptor);

        let mut attributes = Vec::new();
        let mut attribute_count: u16 = 0;
        if let Some(sig) = &spec.signature {
            let attr_name = self.utf8("Signature");
            let sig_index = self.utf8(sig);
            attributes.extend_from_slice(&attr_name.to_be_bytes());
            attributes.extend_from_slice(&2u32.to_be_bytes());
            attributes.extend_from_slice(&sig_index.to_be_bytes());
            attribute_count += 1;
        }
        if let Some(exceptions) = &spec.exceptions {
            let attr_name = self.utf8("Exceptions");
            let indexes: Vec<u16> = exceptions.iter().map(|e| self.class(e)).collect();
            attributes.extend_from_slice(&attr_name.to_be_bytes());
            attributes.extend_from_slice(&(2 + 2 * indexes.len() as u32).to_be_bytes());
            attributes.extend_from_slice(&(indexes.len() as u16).to_be_bytes());
            for index in indexes {
                attributes.extend_from_slice(&index.to_be_bytes());
            }
            attribute_count += 1;
        }

        self.methods.extend_from_slice(&spec.flags.to_be_bytes());
        self.methods.extend_from_slice(&name.to_be_bytes());
        self.methods.extend_from_slice(&descriptor.to_be_bytes());
        self.methods.extend_from_slice(&attribute_count.to_be_bytes());
        self.methods.extend_from_slice(&attributes);
        self.method_count += 1;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&self.pool_count.to_be_bytes());
        out.extend_from_slice(&self.pool);
        out.extend_from_slice(&0x0021u16.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        // interfaces, fields
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&self.method_count.to_be_bytes());
        out.extend_from_slice(&self.methods);
        // class attributes
        out.extend_from_slice(&0u16.to_be_bytes());
        out
    }

    fn next_slot(&mut self, width: u16) -> u16 {
        let index = self.pool_count;
        self.pool_count += width;
        index
    }
}
