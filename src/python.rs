// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Python extension module `irimager`.
//!
//! ```python
//! import irimager
//!
//! irimager.tcp_init("localhost", 1337)
//! frame = irimager.get_palette_image()   # numpy uint8, (height, width, 3)
//! irimager.terminate()
//! ```
//!
//! The SDK is loaded when the module is imported (see
//! [`crate::library_path`]). Images are handed to NumPy without copying.
//! The GIL is released while the SDK runs.

use crate::{error::Error, imager::IrImager};
use numpy::{IntoPyArray, PyArray2, PyArray3};
use pyo3::{
    create_exception,
    exceptions::{PyImportError, PyMemoryError, PyRuntimeError, PyTypeError},
    prelude::*,
};
use std::sync::OnceLock;
use tracing::debug;

create_exception!(irimager, IrImagerError, PyRuntimeError);
create_exception!(irimager, OperationError, IrImagerError);
create_exception!(irimager, FatalError, IrImagerError);
create_exception!(irimager, UnreachableStatusError, IrImagerError);

static IMAGER: OnceLock<IrImager> = OnceLock::new();

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        let msg = err.to_string();
        match err {
            Error::BadArguments(_) => PyTypeError::new_err(msg),
            Error::Operation { .. } => OperationError::new_err(msg),
            Error::Fatal { .. } => FatalError::new_err(msg),
            Error::UnreachableStatus { .. } => UnreachableStatusError::new_err(msg),
            Error::OutOfMemory { .. } => PyMemoryError::new_err(msg),
            Error::Library(_) => PyImportError::new_err(msg),
            Error::InvalidSize { .. } | Error::SessionInUse => IrImagerError::new_err(msg),
        }
    }
}

fn imager() -> PyResult<&'static IrImager> {
    IMAGER
        .get()
        .ok_or_else(|| IrImagerError::new_err("IRImager library is not loaded"))
}

#[pyfunction]
#[pyo3(signature = (xml_config, formats_def=None, log_file=None))]
fn usb_init(
    py: Python<'_>,
    xml_config: &str,
    formats_def: Option<&str>,
    log_file: Option<&str>,
) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.usb_init(xml_config, formats_def, log_file))?;
    Ok(())
}

#[pyfunction]
fn tcp_init(py: Python<'_>, ip: &str, port: i32) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.tcp_init(ip, port))?;
    Ok(())
}

#[pyfunction]
fn terminate(py: Python<'_>) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.terminate())?;
    Ok(())
}

#[pyfunction]
fn get_thermal_image_size(py: Python<'_>) -> PyResult<(i32, i32)> {
    let imager = imager()?;
    Ok(py.allow_threads(|| imager.thermal_image_size())?)
}

#[pyfunction]
fn get_palette_image_size(py: Python<'_>) -> PyResult<(i32, i32)> {
    let imager = imager()?;
    Ok(py.allow_threads(|| imager.palette_image_size())?)
}

/// Thermal frame as `uint16[height, width]`; `(s - 1000) / 10` is °C.
#[pyfunction]
fn get_thermal_image(py: Python<'_>) -> PyResult<Bound<'_, PyArray2<u16>>> {
    let imager = imager()?;
    let image = py.allow_threads(|| imager.thermal_image())?;
    Ok(image.into_pyarray(py))
}

/// False-color frame as `uint8[height, width, 3]`, RGB.
#[pyfunction]
fn get_palette_image(py: Python<'_>) -> PyResult<Bound<'_, PyArray3<u8>>> {
    let imager = imager()?;
    let image = py.allow_threads(|| imager.palette_image())?;
    Ok(image.into_pyarray(py))
}

#[pyfunction]
fn set_palette(py: Python<'_>, id: i32) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.set_palette(id))?;
    Ok(())
}

#[pyfunction]
fn set_palette_scale(py: Python<'_>, scale: i32) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.set_palette_scale(scale))?;
    Ok(())
}

#[pyfunction]
fn set_shutter_mode(py: Python<'_>, mode: i32) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.set_shutter_mode(mode))?;
    Ok(())
}

#[pyfunction]
fn trigger_shutter_flag(py: Python<'_>) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.trigger_shutter_flag())?;
    Ok(())
}

#[pyfunction]
fn set_temperature_range(py: Python<'_>, t_min: i32, t_max: i32) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.set_temperature_range(t_min, t_max))?;
    Ok(())
}

#[pyfunction]
fn set_radiation_parameters(
    py: Python<'_>,
    emissivity: f32,
    transmissivity: f32,
    ambient_temperature: f32,
) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| {
        imager.set_radiation_parameters(emissivity, transmissivity, ambient_temperature)
    })?;
    Ok(())
}

#[pyfunction]
fn set_focus_motor_position(py: Python<'_>, position: f32) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.set_focus_motor_position(position))?;
    Ok(())
}

#[pyfunction]
fn get_focus_motor_position(py: Python<'_>) -> PyResult<f32> {
    let imager = imager()?;
    Ok(py.allow_threads(|| imager.focus_motor_position())?)
}

#[pyfunction]
fn daemon_launch(py: Python<'_>) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.daemon_launch())?;
    Ok(())
}

#[pyfunction]
fn daemon_is_running(py: Python<'_>) -> PyResult<bool> {
    let imager = imager()?;
    Ok(py.allow_threads(|| imager.daemon_is_running())?)
}

#[pyfunction]
fn daemon_kill(py: Python<'_>) -> PyResult<()> {
    let imager = imager()?;
    py.allow_threads(|| imager.daemon_kill())?;
    Ok(())
}

/// Registered with `atexit`; statics are never dropped.
#[pyfunction]
#[pyo3(name = "_shutdown")]
fn shutdown(py: Python<'_>) {
    if let Some(imager) = IMAGER.get() {
        // Logged by shutdown.
        let _ = py.allow_threads(|| imager.shutdown());
    }
}

#[pymodule]
fn irimager(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();

    if IMAGER.get().is_none() {
        let imager = IrImager::open_default()?;
        // The GIL serializes module initialisation, so the cell is still empty.
        let _ = IMAGER.set(imager);
        debug!("irimager module initialised");
    }

    m.add("IrImagerError", py.get_type::<IrImagerError>())?;
    m.add("OperationError", py.get_type::<OperationError>())?;
    m.add("FatalError", py.get_type::<FatalError>())?;
    m.add("UnreachableStatusError", py.get_type::<UnreachableStatusError>())?;

    m.add_function(wrap_pyfunction!(usb_init, m)?)?;
    m.add_function(wrap_pyfunction!(tcp_init, m)?)?;
    m.add_function(wrap_pyfunction!(terminate, m)?)?;
    m.add_function(wrap_pyfunction!(get_thermal_image_size, m)?)?;
    m.add_function(wrap_pyfunction!(get_palette_image_size, m)?)?;
    m.add_function(wrap_pyfunction!(get_thermal_image, m)?)?;
    m.add_function(wrap_pyfunction!(get_palette_image, m)?)?;
    m.add_function(wrap_pyfunction!(set_palette, m)?)?;
    m.add_function(wrap_pyfunction!(set_palette_scale, m)?)?;
    m.add_function(wrap_pyfunction!(set_shutter_mode, m)?)?;
    m.add_function(wrap_pyfunction!(trigger_shutter_flag, m)?)?;
    m.add_function(wrap_pyfunction!(set_temperature_range, m)?)?;
    m.add_function(wrap_pyfunction!(set_radiation_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(set_focus_motor_position, m)?)?;
    m.add_function(wrap_pyfunction!(get_focus_motor_position, m)?)?;
    m.add_function(wrap_pyfunction!(daemon_launch, m)?)?;
    m.add_function(wrap_pyfunction!(daemon_is_running, m)?)?;
    m.add_function(wrap_pyfunction!(daemon_kill, m)?)?;

    let shutdown = wrap_pyfunction!(shutdown, m)?;
    py.import("atexit")?.call_method1("register", (shutdown,))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let err = PyErr::from(Error::BadArguments("set_palette: argument 1".into()));
            assert!(err.is_instance_of::<PyTypeError>(py));

            let err = PyErr::from(Error::Fatal {
                op: "tcp_init",
                message: "Fatal error",
            });
            assert!(err.is_instance_of::<FatalError>(py));
            assert!(err.is_instance_of::<IrImagerError>(py));
            assert!(err.is_instance_of::<PyRuntimeError>(py));

            let err = PyErr::from(Error::Operation {
                op: "usb_init",
                message: "Error",
            });
            assert!(err.is_instance_of::<OperationError>(py));
            assert!(!err.is_instance_of::<FatalError>(py));
        });
    }
}
