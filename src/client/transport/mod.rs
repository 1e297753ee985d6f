use std::io::{Read, Result, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use net2::TcpBuilder;

pub trait Transport: Send + Sync + Sized {
    fn connect(bind: Option<SocketAddr>, dest: SocketAddr) -> Result<Self>;

    fn send(&mut self, data: &[u8]) -> Result<()>;
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn try_clone(&self) -> Result<Self>;
    fn shutdown(&mut self);
}

pub struct Tcp {
    inner: TcpStream,
}

impl Transport for Tcp {
    fn connect(bind: Option<SocketAddr>, dest: SocketAddr) -> Result<Self> {
        let builder = if dest.is_ipv4() {
            TcpBuilder::new_v4()
        } else {
            TcpBuilder::new_v6()
        }?;

        if let Some(bind) = bind {
            builder.bind(bind)?;
        }

        let inner = builder.connect(dest)?;
        // frames are small and latency bound
        inner.set_nodelay(true)?;
        Ok(Tcp { inner })
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner.read(buf)
    }

    fn try_clone(&self) -> Result<Self> {
        self.inner.try_clone().map(|inner| Tcp { inner })
    }

    fn shutdown(&mut self) {
        let _ = self.inner.shutdown(Shutdown::Both);
    }
}
